//! Schema Reference Graph
//!
//! Node arena decoded once from the raw schema document. Vertices are the
//! decoded node shapes, edges are `$ref`, combinator and sequence-item links.
//! A node's identity is its canonical pointer location, so a fragment reached
//! both directly and through a `$ref` is the same vertex.
//!
//! The walker never reads raw JSON - only `SchemaNode` values and edges.

pub mod loader;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// Canonical pointer location of a node (e.g. `#/definitions/uniform`)
pub type NodeLocation = String;

/// The `properties` block of an object node, reduced to what extraction needs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyBlock {
    /// Names from `properties.distribution.enum` and `properties.distribution.const`
    pub distributions: Vec<String>,
    /// Every property key, in document order
    pub keys: Vec<String>,
}

/// Decoded shape of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A mapping, with its `properties` block if it has one
    Object { properties: Option<PropertyBlock> },
    /// A bare sequence of sub-schemas
    List,
    /// Scalars and `null`
    Leaf,
}

/// A vertex in the schema graph
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub location: NodeLocation,
    pub kind: NodeKind,
}

impl SchemaNode {
    /// Distribution names declared by this node, if any
    pub fn distributions(&self) -> &[String] {
        match &self.kind {
            NodeKind::Object { properties: Some(block) } => &block.distributions,
            NodeKind::Object { properties: None } | NodeKind::List | NodeKind::Leaf => &[],
        }
    }
}

/// How one node reaches another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Resolved same-document `$ref`
    Ref,
    AnyOf,
    AllOf,
    OneOf,
    /// Element of a bare sequence node
    Item,
}

impl EdgeKind {
    /// Combinator keywords, in traversal order
    pub const COMBINATORS: [(&'static str, EdgeKind); 3] = [
        ("anyOf", EdgeKind::AnyOf),
        ("allOf", EdgeKind::AllOf),
        ("oneOf", EdgeKind::OneOf),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EdgeKind::Ref => "$ref",
            EdgeKind::AnyOf => "anyOf",
            EdgeKind::AllOf => "allOf",
            EdgeKind::OneOf => "oneOf",
            EdgeKind::Item => "item",
        }
    }
}

/// Edge weight. `ordinal` preserves the order edges were discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEdge {
    pub kind: EdgeKind,
    pub ordinal: usize,
}

/// Decoded schema document
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    pub(crate) graph: DiGraph<SchemaNode, SchemaEdge>,
    pub(crate) by_location: HashMap<NodeLocation, NodeIndex>,
    /// One entry per `definitions` member, in document order
    pub(crate) roots: Vec<NodeIndex>,
}

impl SchemaGraph {
    /// Decode a parsed schema document
    pub fn from_document(document: &Value) -> Result<Self> {
        loader::load_document(document)
    }

    /// Number of materialized nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of reference/combinator/item links
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Entry points, one per definition
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Get a node by index
    pub fn node(&self, idx: NodeIndex) -> &SchemaNode {
        &self.graph[idx]
    }

    /// Look up a node by its canonical location
    pub fn get(&self, location: &str) -> Option<&SchemaNode> {
        self.by_location.get(location).map(|&idx| &self.graph[idx])
    }

    /// Outgoing links of a node in discovery order
    pub fn children(&self, idx: NodeIndex) -> Vec<(EdgeKind, NodeIndex)> {
        let mut edges: Vec<(usize, EdgeKind, NodeIndex)> = self.graph
            .edges(idx)
            .map(|e| (e.weight().ordinal, e.weight().kind, e.target()))
            .collect();
        edges.sort_by_key(|(ordinal, _, _)| *ordinal);
        edges.into_iter().map(|(_, kind, target)| (kind, target)).collect()
    }

    /// Reference cycles: strongly connected groups of more than one node,
    /// plus nodes that link to themselves. Locations are sorted.
    pub fn cycle_groups(&self) -> Vec<Vec<NodeLocation>> {
        let mut groups: Vec<Vec<NodeLocation>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut members: Vec<NodeLocation> = scc
                    .into_iter()
                    .map(|idx| self.graph[idx].location.clone())
                    .collect();
                members.sort();
                members
            })
            .collect();
        groups.sort();
        groups
    }

    /// Export the graph to GraphViz DOT format
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph SchemaGraph {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=\"filled,rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8, fontcolor=\"#808080\"];\n");
        output.push('\n');

        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            let color = match &node.kind {
                NodeKind::Object { properties: Some(block) } if !block.distributions.is_empty() => "#4CAF50",
                NodeKind::Object { .. } => "#2196F3",
                NodeKind::List => "#FF9800",
                NodeKind::Leaf => "#9E9E9E",
            };
            let label = match node.distributions() {
                [] => node.location.clone(),
                names => format!("{}\\n[{}]", node.location, names.join(", ")),
            };
            output.push_str(&format!(
                "  n{} [label=\"{}\", fillcolor=\"{}\"];\n",
                idx.index(),
                escape_label(&label),
                color
            ));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            output.push_str(&format!(
                "  n{} -> n{} [label=\"{}\"];\n",
                edge.source().index(),
                edge.target().index(),
                edge.weight().kind.label()
            ));
        }

        output.push_str("}\n");
        output
    }
}

/// Escape a DOT string literal: backslashes first, then quotes
fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
