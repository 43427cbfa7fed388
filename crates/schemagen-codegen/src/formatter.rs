//! Post-processing of generated code
//!
//! Generated code is piped through an external formatter (`gofmt` by
//! default) before it is written.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Why a formatter did not produce output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FormatDiagnostic(pub String);

/// A source code formatter
#[async_trait]
pub trait Formatter: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Format `source`, returning the formatted text
    async fn format(&self, source: &str) -> Result<String, FormatDiagnostic>;
}

/// Runs an external program that reads source on stdin and writes it to stdout
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    /// Create a formatter running `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add arguments passed before the source is read from stdin
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `gofmt` reading from stdin
    pub fn gofmt() -> Self {
        Self::new("gofmt")
    }
}

#[async_trait]
impl Formatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    async fn format(&self, source: &str) -> Result<String, FormatDiagnostic> {
        tracing::debug!("Running formatter: {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FormatDiagnostic(format!("failed to run {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| FormatDiagnostic(format!("{} has no stdin", self.program)))?;
        let input = source.as_bytes();
        let write = async move {
            let written = stdin.write_all(input).await;
            // Closing the pipe lets the formatter see EOF.
            drop(stdin);
            written
        };

        // Feed stdin while draining stdout so large sources cannot fill both pipes.
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output
            .map_err(|e| FormatDiagnostic(format!("failed to wait for {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let diagnostic = if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(FormatDiagnostic(diagnostic));
        }
        written.map_err(|e| FormatDiagnostic(format!("failed to write to {}: {}", self.program, e)))?;

        String::from_utf8(output.stdout)
            .map_err(|e| FormatDiagnostic(format!("{} produced invalid UTF-8: {}", self.program, e)))
    }
}

/// Leaves source untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

#[async_trait]
impl Formatter for NoopFormatter {
    fn name(&self) -> &str {
        "none"
    }

    async fn format(&self, source: &str) -> Result<String, FormatDiagnostic> {
        Ok(source.to_string())
    }
}
