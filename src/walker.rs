//! Node Walker
//!
//! Depth-first traversal of the decoded graph from every definition. Each
//! node is entered at most once per run (keyed by its index, i.e. its
//! location), which makes reference cycles and diamond reconvergence safe.
//! At every node the resolved `$ref` target is visited first, then the node's
//! own distribution declarations are recorded, then combinator branches and
//! sequence items are visited in document order.

use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use tracing::debug;

use crate::graph::{EdgeKind, NodeKind, SchemaGraph};
use crate::order::OrderHints;
use crate::recorder::PropertyRecorder;

/// Traversal state for one run
pub struct Walker<'g> {
    graph: &'g SchemaGraph,
    visited: HashSet<NodeIndex>,
    recorder: PropertyRecorder,
}

impl<'g> Walker<'g> {
    pub fn new(graph: &'g SchemaGraph, hints: OrderHints) -> Self {
        Self {
            graph,
            visited: HashSet::with_capacity(graph.node_count()),
            recorder: PropertyRecorder::new(hints),
        }
    }

    /// Walk every definition and hand back the filled recorder
    pub fn walk_definitions(mut self) -> PropertyRecorder {
        for &root in self.graph.roots() {
            self.visit(root);
        }
        debug!(
            visited = self.visited.len(),
            distributions = self.recorder.distribution_count(),
            "Walk complete"
        );
        self.recorder
    }

    /// Number of nodes entered so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Visit a single node and everything reachable from it
    pub fn visit(&mut self, idx: NodeIndex) {
        if !self.visited.insert(idx) {
            return;
        }

        let (references, branches): (Vec<_>, Vec<_>) = self
            .graph
            .children(idx)
            .into_iter()
            .partition(|(kind, _)| *kind == EdgeKind::Ref);

        for (_, target) in references {
            self.visit(target);
        }

        let node = self.graph.node(idx);
        match &node.kind {
            NodeKind::Object { properties: Some(block) } => {
                for distribution in &block.distributions {
                    self.recorder.record(distribution, &block.keys);
                }
            }
            NodeKind::Object { properties: None } | NodeKind::List | NodeKind::Leaf => {}
        }

        for (_, target) in branches {
            self.visit(target);
        }
    }
}

/// Walk `graph` from its definitions with the given hint table
pub fn walk(graph: &SchemaGraph, hints: OrderHints) -> PropertyRecorder {
    Walker::new(graph, hints).walk_definitions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn walk_json(doc: serde_json::Value) -> PropertyRecorder {
        let graph = SchemaGraph::from_document(&doc).unwrap();
        walk(&graph, OrderHints::default())
    }

    #[test]
    fn test_const_declaration() {
        let recorder = walk_json(json!({
            "definitions": {
                "X": {
                    "properties": { "distribution": { "const": "constant" }, "value": {} }
                }
            }
        }));
        let table = recorder.into_table();
        assert_eq!(table.get("constant").unwrap(), ["value"]);
    }

    #[test]
    fn test_reference_cycle_terminates() {
        let recorder = walk_json(json!({
            "definitions": {
                "loop": {
                    "properties": { "distribution": { "const": "normal" }, "mu": {} },
                    "anyOf": [
                        { "$ref": "#/definitions/loop" },
                        { "properties": { "distribution": { "const": "normal" }, "sigma": {} } }
                    ]
                }
            }
        }));
        let table = recorder.into_table();
        assert_eq!(table.get("normal").unwrap(), ["mu", "sigma"]);
    }

    #[test]
    fn test_node_reachable_twice_is_visited_once() {
        let doc = json!({
            "definitions": {
                "shared": { "properties": { "distribution": { "const": "uniform" }, "min": {} } },
                "left": { "$ref": "#/definitions/shared" },
                "right": { "oneOf": [ { "$ref": "#/definitions/shared" } ] }
            }
        });
        let graph = SchemaGraph::from_document(&doc).unwrap();
        let mut walker = Walker::new(&graph, OrderHints::default());
        for &root in graph.roots() {
            walker.visit(root);
        }
        assert_eq!(walker.visited_count(), graph.node_count());
    }

    #[test]
    fn test_nested_sequence_through_reference() {
        let recorder = walk_json(json!({
            "definitions": {
                "alias": { "$ref": "#/definitions/holder/variants" },
                "holder": {
                    "variants": [
                        { "properties": { "distribution": { "enum": ["beta"] }, "a": {}, "b": {} } }
                    ]
                }
            }
        }));
        let table = recorder.into_table();
        assert_eq!(table.get("beta").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_properties_of_plain_nodes_contribute_nothing() {
        let recorder = walk_json(json!({
            "definitions": {
                "metric": { "properties": { "name": {}, "goal": {} } }
            }
        }));
        assert_eq!(recorder.distribution_count(), 0);
    }
}
