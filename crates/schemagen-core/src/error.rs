//! Error types for schemagen-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for schemagen-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading connector configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not have the expected shape
    #[error("malformed connector configuration {}: {message}", path.display())]
    Malformed {
        /// Path of the document (`<memory>` for in-memory input)
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// A polymorphic value could not be converted to the requested type
    #[error("cannot convert {found} to {expected}")]
    Conversion {
        /// Target type of the conversion
        expected: &'static str,
        /// Description of the value that was found
        found: String,
    },

    /// A config entry cannot be modeled as a schema attribute
    #[error("invalid entry '{entry}': {message}")]
    Model {
        /// Backend name of the offending entry
        entry: String,
        /// Description of the violation
        message: String,
    },
}

impl Error {
    /// Attach an entry name to a conversion failure, turning it into a model error.
    pub fn for_entry(self, entry: &str) -> Self {
        match self {
            Error::Conversion { .. } => Error::Model {
                entry: entry.to_string(),
                message: self.to_string(),
            },
            other => other,
        }
    }
}
