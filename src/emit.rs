//! Output rendering
//!
//! Pure formatting of a finished `DistributionTable`. The default form is a
//! single constant assignment with one distribution per line:
//!
//! ```text
//! SUPPORTED_DISTRIBUTIONS = {
//!     "constant": ["value"],
//!     "uniform": ["min", "max"],
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::order::DistributionTable;

/// Name of the generated constant
pub const DEFAULT_CONSTANT_NAME: &str = "SUPPORTED_DISTRIBUTIONS";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `NAME = { ... }` constant assignment
    #[default]
    Constant,
    /// Pretty-printed JSON object
    Json,
}

/// Renders a table in the configured format
#[derive(Debug, Clone)]
pub struct Emitter {
    pub constant_name: String,
    pub format: OutputFormat,
    pub indent: usize,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            constant_name: DEFAULT_CONSTANT_NAME.to_string(),
            format: OutputFormat::Constant,
            indent: 4,
        }
    }
}

impl Emitter {
    pub fn render(&self, table: &DistributionTable) -> Result<String> {
        match self.format {
            OutputFormat::Constant => Ok(self.render_constant(table)),
            OutputFormat::Json => {
                let mut output = serde_json::to_string_pretty(table)?;
                output.push('\n');
                Ok(output)
            }
        }
    }

    fn render_constant(&self, table: &DistributionTable) -> String {
        let pad = " ".repeat(self.indent);
        let mut output = format!("{} = {{\n", self.constant_name);

        for (distribution, keys) in table.iter() {
            let keys: Vec<String> = keys.iter().map(|key| quote(key)).collect();
            output.push_str(&format!("{}{}: [{}],\n", pad, quote(distribution), keys.join(", ")));
        }

        output.push_str("}\n");
        output
    }
}

/// Double-quoted string literal with JSON escaping
fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
