//! Error types for code generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or modeling the connector configuration failed
    #[error(transparent)]
    Core(#[from] schemagen_core::Error),

    /// Invalid output template
    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] minijinja::Error),

    /// Failed to create the output directory or write a file
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The formatter rejected the generated code
    #[error("formatting {} failed: {diagnostic}", path.display())]
    Format {
        /// Path the formatted output would have been written to
        path: PathBuf,
        /// Formatter diagnostic (usually its stderr)
        diagnostic: String,
    },
}
