//! Schema retrieval
//!
//! Loads the schema document from the remote sweeps repository (HTTPS with
//! certificate validation) or from a local file, and parses it into a plain
//! `serde_json::Value`.

use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::checksum::Checksum;
use crate::error::{DistributionError, Result};

/// Location of the sweeps configuration schema
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/wandb/sweeps/master/src/sweeps/config/schema.json";

/// Where to read the schema document from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::Url(url) => write!(f, "{}", url),
            SchemaSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed schema document
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub value: Value,
    /// Digest of the raw bytes as received
    pub checksum: Checksum,
    pub source: SchemaSource,
}

impl SchemaDocument {
    /// Parse raw bytes received from `source`
    pub fn from_bytes(bytes: &[u8], source: SchemaSource) -> Result<Self> {
        let value = serde_json::from_slice(bytes)?;
        Ok(Self {
            value,
            checksum: Checksum::from_bytes(bytes),
            source,
        })
    }

    /// Fetch or read the document
    pub fn load(source: &SchemaSource, timeout: Duration) -> Result<Self> {
        let bytes = match source {
            SchemaSource::Url(url) => fetch_url(url, timeout)?,
            SchemaSource::File(path) => read_file(path)?,
        };
        let document = Self::from_bytes(&bytes, source.clone())?;
        info!(
            source = %document.source,
            bytes = bytes.len(),
            sha256 = document.checksum.short(),
            "Loaded schema document"
        );
        Ok(document)
    }
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    debug!(url, "Fetching schema");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(DistributionError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.bytes()?.to_vec())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    debug!(path = %path.display(), "Reading schema");
    Ok(std::fs::read(path)?)
}
