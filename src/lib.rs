//! Sweep Distribution Extractor
//!
//! Derives, from the sweeps configuration JSON Schema, the ordered list of
//! configuration parameters for every supported distribution, and renders it
//! as a `SUPPORTED_DISTRIBUTIONS` constant.
//!
//! ## Pipeline
//!
//! ```text
//! fetch ──► graph::loader ──► walker ──► recorder ──► order ──► emit
//! (JSON)    (node arena)      (DFS,      (slot map    (priority,  (text)
//!                              visited    per dist)    name)
//!                              set)
//! ```
//!
//! - **Same-document refs only**: `#/...` pointers are followed, anything
//!   else is skipped; a local pointer to a missing path is fatal
//! - **Cycle safe**: every node location is materialized and visited once
//! - **Deterministic**: distributions sort by name, parameters by
//!   `(priority, name)`

pub mod checksum;
pub mod config;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod order;
pub mod pointer;
pub mod recorder;
pub mod walker;

use serde_json::Value;
use tracing::info;

pub use checksum::Checksum;
pub use config::GeneratorConfig;
pub use emit::{Emitter, OutputFormat};
pub use error::{DistributionError, Result};
pub use fetch::{SchemaDocument, SchemaSource};
pub use graph::SchemaGraph;
pub use order::{DistributionTable, OrderHints};
pub use recorder::PropertyRecorder;
pub use walker::Walker;

/// Output from a generation run
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Rendered text
    pub text: String,
    /// The table the text was rendered from
    pub table: DistributionTable,
    /// Decoded document, for graph export
    pub graph: SchemaGraph,
    /// Number of reference cycles in the document
    pub cycle_count: usize,
}

/// Extract the distribution table from a parsed schema document
pub fn extract(document: &Value, hints: &OrderHints) -> Result<DistributionTable> {
    let graph = SchemaGraph::from_document(document)?;
    Ok(walker::walk(&graph, hints.clone()).into_table())
}

/// Run the full pipeline with `config`
pub fn generate(document: &Value, config: &GeneratorConfig) -> Result<GeneratedOutput> {
    let graph = SchemaGraph::from_document(document)?;

    let cycles = graph.cycle_groups();
    if !cycles.is_empty() {
        info!(count = cycles.len(), "Schema contains reference cycles");
    }

    let table = walker::walk(&graph, config.ordering.clone()).into_table();
    let text = config.output.emitter().render(&table)?;

    info!(
        nodes = graph.node_count(),
        distributions = table.len(),
        "Generated distribution table"
    );

    Ok(GeneratedOutput {
        text,
        table,
        graph,
        cycle_count: cycles.len(),
    })
}
