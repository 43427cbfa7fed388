//! Schema generator
//!
//! Ties the pipeline together: load a connector configuration, model it,
//! emit Go and format it.

use std::path::{Path, PathBuf};

use schemagen_core::ConnectorSpec;

use crate::emitter::{Emitter, GeneratedFile};
use crate::error::Result;
use crate::formatter::{CommandFormatter, Formatter, NoopFormatter};
use crate::model::EntityKind;
use crate::modeler::Modeler;

/// How generated code is formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatterConfig {
    /// Pipe through an external program (stdin → stdout)
    Command {
        /// Program to run
        program: String,
        /// Arguments passed to it
        args: Vec<String>,
    },
    /// Write the rendered code as-is
    Disabled,
}

impl FormatterConfig {
    /// `gofmt` with no arguments
    pub fn gofmt() -> Self {
        Self::Command {
            program: "gofmt".to_string(),
            args: Vec::new(),
        }
    }

    fn build(&self) -> Box<dyn Formatter> {
        match self {
            Self::Command { program, args } => {
                Box::new(CommandFormatter::new(program.clone()).with_args(args.iter().cloned()))
            }
            Self::Disabled => Box::new(NoopFormatter),
        }
    }
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self::gofmt()
    }
}

/// Options for the generator
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory generated files are written to
    pub output_dir: PathBuf,

    /// Formatter applied before writing
    pub formatter: FormatterConfig,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            formatter: FormatterConfig::default(),
        }
    }
}

/// Schema generator
pub struct Generator {
    options: GenerateOptions,
    emitter: Emitter,
    formatter: Box<dyn Formatter>,
}

impl Generator {
    /// Create a new generator with the given options
    pub fn new(options: GenerateOptions) -> Result<Self> {
        Ok(Self {
            emitter: Emitter::new()?,
            formatter: options.formatter.build(),
            options,
        })
    }

    /// Replace the configured formatter
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.options.output_dir
    }

    /// Generate the schema file for an already loaded configuration
    pub async fn generate(
        &self,
        spec: &ConnectorSpec,
        kind: EntityKind,
        code: &str,
    ) -> Result<GeneratedFile> {
        tracing::info!("Generating {} {}", kind, code);

        let model = Modeler::new(kind, code).model(spec)?;
        self.emitter
            .emit(&model, &self.options.output_dir, self.formatter.as_ref())
            .await
    }

    /// Load the configuration at `path` and generate its schema file
    pub async fn generate_file(
        &self,
        path: impl AsRef<Path>,
        kind: EntityKind,
        code: &str,
    ) -> Result<GeneratedFile> {
        let spec = ConnectorSpec::load(path.as_ref())?;
        self.generate(&spec, kind, code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn options(dir: &Path, formatter: FormatterConfig) -> GenerateOptions {
        GenerateOptions {
            output_dir: dir.to_path_buf(),
            formatter,
        }
    }

    #[test]
    fn test_default_options() {
        let options = GenerateOptions::default();
        assert_eq!(options.output_dir, PathBuf::from("generated"));
        assert_eq!(options.formatter, FormatterConfig::gofmt());
    }

    #[test]
    fn test_formatter_config_build() {
        assert_eq!(FormatterConfig::Disabled.build().name(), "none");
        let custom = FormatterConfig::Command {
            program: "goimports".to_string(),
            args: vec![],
        };
        assert_eq!(custom.build().name(), "goimports");
    }

    #[tokio::test]
    async fn test_generate_from_spec() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ConnectorSpec::from_json(
            r#"{"display_name": "Snowflake", "config": [
                {"name": "snowflake.url.name", "user_defined": true, "required": true,
                 "value": {"control": "string"}}
            ]}"#,
        )
        .unwrap();

        let generator = Generator::new(options(dir.path(), FormatterConfig::Disabled)).unwrap();
        let file = generator
            .generate(&spec, EntityKind::Destination, "snowflake")
            .await
            .unwrap();

        assert_eq!(file.path, dir.path().join("destination_snowflake.go"));
        let code = std::fs::read_to_string(&file.path).unwrap();
        assert!(code.contains("DestinationSnowflakeModel"));
        assert!(code.contains("\"snowflake_url_name\": \"snowflake.url.name\""));
    }

    #[tokio::test]
    async fn test_generate_file_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(options(dir.path(), FormatterConfig::Disabled)).unwrap();

        let err = generator
            .generate_file(dir.path().join("missing.json"), EntityKind::Source, "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Core(schemagen_core::Error::Io { .. })));
        assert!(!dir.path().join("source_missing.go").exists());
    }

    #[tokio::test]
    async fn test_with_formatter_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ConnectorSpec::from_json(r#"{"display_name": "Bare", "config": []}"#).unwrap();

        let generator = Generator::new(options(
            dir.path(),
            FormatterConfig::Command {
                program: "schemagen-no-such-formatter".to_string(),
                args: vec![],
            },
        ))
        .unwrap()
        .with_formatter(CommandFormatter::new("cat"));

        let file = generator
            .generate(&spec, EntityKind::Source, "bare")
            .await
            .unwrap();
        assert!(file.path.exists());
    }
}
