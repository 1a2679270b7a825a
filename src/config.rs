//! Configuration management for the distribution extractor
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (distributions.toml)
//! - Environment variables (SWEEP_DISTRIBUTIONS__*)
//!
//! With nothing configured the tool fetches the upstream sweeps schema and
//! prints `SUPPORTED_DISTRIBUTIONS` in constant form.
//!
//! ## Example config file (distributions.toml):
//! ```toml
//! [source]
//! path = "./schema.json"
//! timeout_secs = 10
//!
//! [output]
//! constant_name = "SUPPORTED_DISTRIBUTIONS"
//! format = "constant"
//! indent = 4
//!
//! [ordering]
//! default_priority = 5
//!
//! [ordering.hints]
//! low = 0
//! high = 1
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::emit::{Emitter, OutputFormat, DEFAULT_CONSTANT_NAME};
use crate::fetch::{SchemaSource, DEFAULT_SCHEMA_URL};
use crate::order::{OrderHints, Priority};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Where the schema comes from
    #[serde(default)]
    pub source: SourceConfig,

    /// Rendering settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Parameter order hints
    #[serde(default)]
    pub ordering: OrderHints,
}

/// Schema source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Remote schema URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Local schema file; takes precedence over `url`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Name of the emitted constant
    #[serde(default = "default_constant_name")]
    pub constant_name: String,

    /// Output format (constant or json)
    #[serde(default)]
    pub format: OutputFormat,

    /// Spaces before each entry
    #[serde(default = "default_indent")]
    pub indent: usize,
}

// Default value functions
fn default_url() -> String {
    DEFAULT_SCHEMA_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_constant_name() -> String {
    DEFAULT_CONSTANT_NAME.to_string()
}

fn default_indent() -> usize {
    4
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            constant_name: default_constant_name(),
            format: OutputFormat::Constant,
            indent: default_indent(),
        }
    }
}

impl SourceConfig {
    /// Resolved schema source
    pub fn schema_source(&self) -> SchemaSource {
        match &self.path {
            Some(path) => SchemaSource::File(path.clone()),
            None => SchemaSource::Url(self.url.clone()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl OutputConfig {
    pub fn emitter(&self) -> Emitter {
        Emitter {
            constant_name: self.constant_name.clone(),
            format: self.format,
            indent: self.indent,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration, optionally adding a specific (required) file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // Defaults go in as a source so partial tables (e.g. one extra hint)
        // merge with them instead of replacing them.
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let config_locations = [
            "distributions.toml",
            ".distributions.toml",
            "config/distributions.toml",
        ];

        let mut files: Vec<PathBuf> = config_locations
            .iter()
            .map(PathBuf::from)
            .filter(|path| path.exists())
            .collect();

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("com", "wandb", "sweep-distributions") {
            let xdg_config = config_dir.config_dir().join("distributions.toml");
            if xdg_config.exists() {
                files.push(xdg_config);
            }
        }

        for file in &files {
            builder = builder.add_source(File::from(file.as_path()).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
            files.push(path.to_path_buf());
        }

        // SWEEP_DISTRIBUTIONS__OUTPUT__FORMAT=json
        builder = builder.add_source(
            Environment::with_prefix("SWEEP_DISTRIBUTIONS")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.ordering.hints = restore_hint_case(&config.ordering.hints, &files)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

/// The config crate lowercases every key it reads, but hint keys are matched
/// against case-sensitive property names. Rebuild the hint table from the raw
/// TOML files, then apply values that only the lowercased table carries
/// (environment overrides).
fn restore_hint_case(
    loaded: &BTreeMap<String, Priority>,
    files: &[PathBuf],
) -> Result<BTreeMap<String, Priority>, ConfigError> {
    let mut hints = OrderHints::default().hints;

    for file in files {
        let content = std::fs::read_to_string(file)
            .map_err(|e| ConfigError::Message(format!("{}: {}", file.display(), e)))?;
        let table: toml::Table = content
            .parse()
            .map_err(|e| ConfigError::Message(format!("{}: {}", file.display(), e)))?;

        let Some(file_hints) = table
            .get("ordering")
            .and_then(|ordering| ordering.get("hints"))
            .and_then(toml::Value::as_table)
        else {
            continue;
        };

        for (key, value) in file_hints {
            let priority = value.as_integer().ok_or_else(|| {
                ConfigError::Message(format!(
                    "{}: ordering.hints.{} must be an integer",
                    file.display(),
                    key
                ))
            })?;
            hints.insert(key.clone(), priority);
        }
    }

    for (key, &priority) in loaded {
        let matching: Vec<String> = hints
            .keys()
            .filter(|existing| existing.to_lowercase() == *key)
            .cloned()
            .collect();
        if matching.is_empty() {
            hints.insert(key.clone(), priority);
        }
        for existing in matching {
            hints.insert(existing, priority);
        }
    }

    Ok(hints)
}
