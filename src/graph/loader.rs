//! Schema Loading
//!
//! Decodes the parsed document into a `SchemaGraph`, starting from every
//! member of `definitions` and following same-document `$ref`s and combinator
//! branches. Each location is materialized once; the index is registered
//! before its children are decoded, so self-referential schemas terminate.

use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{EdgeKind, NodeKind, NodeLocation, PropertyBlock, SchemaEdge, SchemaGraph, SchemaNode};
use crate::error::{DistributionError, Result};
use crate::pointer::{self, ROOT_LOCATION};

/// Property naming the distribution discriminator
pub const DISTRIBUTION_KEY: &str = "distribution";

/// Section holding the entry points
pub const DEFINITIONS_KEY: &str = "definitions";

/// Decode a parsed schema document into a graph
pub fn load_document(document: &Value) -> Result<SchemaGraph> {
    let Some(root) = document.as_object() else {
        return Err(DistributionError::InvalidDocument(
            "document root is not an object".to_string(),
        ));
    };

    let mut loader = Loader::new(document);

    let definitions = match root.get(DEFINITIONS_KEY) {
        Some(Value::Object(definitions)) => definitions,
        Some(_) => {
            return Err(DistributionError::InvalidDocument(
                "`definitions` is not an object".to_string(),
            ))
        }
        None => {
            warn!("Schema document has no `definitions` section");
            return Ok(loader.finish(Vec::new()));
        }
    };

    let section = pointer::child_location(ROOT_LOCATION, DEFINITIONS_KEY);
    let mut roots = Vec::with_capacity(definitions.len());
    for (name, definition) in definitions {
        let location = pointer::child_location(&section, name);
        roots.push(loader.materialize(definition, location)?);
    }

    let graph = loader.finish(roots);
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Decoded schema graph"
    );
    Ok(graph)
}

struct Loader<'a> {
    document: &'a Value,
    graph: DiGraph<SchemaNode, SchemaEdge>,
    by_location: HashMap<NodeLocation, NodeIndex>,
}

impl<'a> Loader<'a> {
    fn new(document: &'a Value) -> Self {
        Self {
            document,
            graph: DiGraph::new(),
            by_location: HashMap::new(),
        }
    }

    fn finish(self, roots: Vec<NodeIndex>) -> SchemaGraph {
        SchemaGraph {
            graph: self.graph,
            by_location: self.by_location,
            roots,
        }
    }

    /// Decode `value` at `location`, returning the existing index if the
    /// location was already materialized.
    fn materialize(&mut self, value: &'a Value, location: NodeLocation) -> Result<NodeIndex> {
        if let Some(&idx) = self.by_location.get(&location) {
            return Ok(idx);
        }

        let kind = match value {
            Value::Object(map) => NodeKind::Object {
                properties: decode_properties(map, &location),
            },
            Value::Array(_) => NodeKind::List,
            _ => NodeKind::Leaf,
        };

        let idx = self.graph.add_node(SchemaNode {
            location: location.clone(),
            kind,
        });
        self.by_location.insert(location.clone(), idx);

        let mut ordinal = 0;
        match value {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                    match pointer::resolve(reference, self.document)? {
                        Some(target) => {
                            debug!(from = %location, to = %target.location, "Resolved reference");
                            let child = self.materialize(target.value, target.location)?;
                            self.link(idx, child, EdgeKind::Ref, &mut ordinal);
                        }
                        None => {
                            debug!(at = %location, reference, "Skipping non-local reference");
                        }
                    }
                }

                for (keyword, edge_kind) in EdgeKind::COMBINATORS {
                    let Some(Value::Array(members)) = map.get(keyword) else {
                        continue;
                    };
                    let branch = pointer::child_location(&location, keyword);
                    for (i, member) in members.iter().enumerate() {
                        let child = self.materialize(member, pointer::child_location(&branch, &i.to_string()))?;
                        self.link(idx, child, edge_kind, &mut ordinal);
                    }
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let child = self.materialize(item, pointer::child_location(&location, &i.to_string()))?;
                    self.link(idx, child, EdgeKind::Item, &mut ordinal);
                }
            }
            _ => {}
        }

        Ok(idx)
    }

    fn link(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind, ordinal: &mut usize) {
        self.graph.add_edge(from, to, SchemaEdge { kind, ordinal: *ordinal });
        *ordinal += 1;
    }
}

/// Reduce a `properties` mapping to its keys and declared distribution names
fn decode_properties(map: &Map<String, Value>, location: &str) -> Option<PropertyBlock> {
    let properties = map.get("properties")?.as_object()?;

    let mut distributions = Vec::new();
    if let Some(spec) = properties.get(DISTRIBUTION_KEY).and_then(Value::as_object) {
        let enum_values = spec
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| values.iter())
            .into_iter()
            .flatten();
        let const_value = spec.get("const").filter(|v| !v.is_null());

        for name in enum_values.chain(const_value) {
            match name.as_str() {
                Some(name) => distributions.push(name.to_string()),
                None => warn!(at = %location, value = %name, "Ignoring non-string distribution name"),
            }
        }
    }

    Some(PropertyBlock {
        distributions,
        keys: properties.keys().cloned().collect(),
    })
}
