//! Connector configuration documents
//!
//! Each connector plugin on the backend ships a JSON document listing its
//! configuration entries. This module loads such a document into a
//! [`ConnectorSpec`].
//!
//! # Document shape
//!
//! ```json
//! {
//!   "display_name": "PostgreSQL",
//!   "config": [
//!     {
//!       "name": "database.hostname.user.defined",
//!       "user_defined": true,
//!       "required": true,
//!       "display_name": "Hostname",
//!       "value": { "control": "string" }
//!     }
//!   ]
//! }
//! ```
//!
//! Unknown keys are ignored at every level.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::value::{ValueObject, null_as_default};

/// A parsed connector configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Human-readable connector name (e.g. "PostgreSQL")
    pub display_name: String,

    /// Connector description
    #[serde(default)]
    pub description: Option<String>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_levels: Option<serde_json::Value>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debezium_connector_name: Option<String>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialisation: Option<serde_json::Value>,

    /// Configuration entries in document order
    #[serde(rename = "config")]
    pub entries: Vec<ConfigEntry>,
}

/// One candidate field of a connector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Dotted backend identifier (e.g. `database.hostname.user.defined`)
    pub name: String,

    /// Whether the end user supplies this entry
    pub user_defined: bool,

    /// Required flag; absent means not required
    #[serde(default)]
    pub required: Option<bool>,

    /// Help text
    #[serde(default)]
    pub description: Option<String>,

    /// Label
    #[serde(default)]
    pub display_name: Option<String>,

    /// Whether the value is stored encrypted
    #[serde(default, deserialize_with = "null_as_default")]
    pub encrypt: bool,

    /// Whether the value is immutable after creation
    #[serde(default, deserialize_with = "null_as_default")]
    pub set_once: bool,

    /// Visibility conditions; parsed, never evaluated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,

    /// Kafka Connect passthrough marker; opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kafka_config: Option<KafkaConfig>,

    /// Value metadata
    pub value: ValueObject,
}

/// A visibility condition on another entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Comparison operator
    pub operator: ConditionOperator,

    /// Name of the entry the condition refers to
    pub config: String,

    /// Operand
    pub value: serde_json::Value,
}

/// Condition operator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionOperator {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Member of a list
    In,
}

/// `kafka_config` is either a flag or an object of overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KafkaConfig {
    /// Plain marker
    Flag(bool),
    /// Override object
    Object(serde_json::Map<String, serde_json::Value>),
}

impl ConnectorSpec {
    /// Load a connector configuration document from disk
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let spec = ConnectorSpec::load("app/sources/plugins/postgresql/configuration.latest.json")?;
    /// println!("Connector: {}", spec.display_name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::parse(&contents, path)?;
        tracing::debug!(
            "Loaded {} ({} entries) from {}",
            spec.display_name,
            spec.entries.len(),
            path.display()
        );
        Ok(spec)
    }

    /// Parse a connector configuration document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, Path::new("<memory>"))
    }

    fn parse(json: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Malformed {
            path: PathBuf::from(path),
            message: e.to_string(),
        })
    }

    /// Entries the end user supplies, in document order
    pub fn user_entries(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.iter().filter(|e| e.user_defined)
    }
}

impl ConfigEntry {
    /// Required flag with absence meaning `false`
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}
