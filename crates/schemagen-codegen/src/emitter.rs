//! Go code emission
//!
//! Renders a [`ConnectorModel`] through a fixed template into a Go file for
//! the Terraform plugin framework, pipes it through a [`Formatter`] and
//! writes it to `<output_dir>/<entity>_<code>.go`.

use minijinja::Environment;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::formatter::Formatter;
use crate::model::*;

/// Name written into the generated-code banner
pub const GENERATOR_NAME: &str = "schemagen";

/// Extension of emitted files
pub const OUTPUT_EXTENSION: &str = "go";

const TEMPLATE_NAME: &str = "schema.go";
const TEMPLATE: &str = include_str!("../templates/schema.go.jinja");

const FRAMEWORK: &str = "github.com/hashicorp/terraform-plugin-framework";
const FRAMEWORK_VALIDATORS: &str = "github.com/hashicorp/terraform-plugin-framework-validators";

/// Go spelling of a scalar kind
struct GoKind {
    /// Package prefix shared by the kind's helper packages (`string` → `stringdefault`)
    prefix: &'static str,
    /// Suffix of the framework types (`String` → `types.String`)
    name: &'static str,
}

fn go_kind(kind: ScalarKind) -> GoKind {
    match kind {
        ScalarKind::String => GoKind {
            prefix: "string",
            name: "String",
        },
        ScalarKind::Int64 => GoKind {
            prefix: "int64",
            name: "Int64",
        },
        ScalarKind::Bool => GoKind {
            prefix: "bool",
            name: "Bool",
        },
        ScalarKind::ListOfString => GoKind {
            prefix: "list",
            name: "List",
        },
    }
}

const KINDS: [ScalarKind; 4] = [
    ScalarKind::String,
    ScalarKind::Int64,
    ScalarKind::Bool,
    ScalarKind::ListOfString,
];

/// Sorted import paths needed by code with the given capabilities
pub fn imports(caps: &Capabilities) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();

    // The schema function and the model struct (types.String for `id`) are always emitted.
    imports.insert(format!("{}/resource/schema", FRAMEWORK));
    imports.insert(format!("{}/types", FRAMEWORK));

    if caps.any_plan_modifiers() {
        imports.insert(format!("{}/resource/schema/planmodifier", FRAMEWORK));
    }
    if caps.any_validators() {
        imports.insert(format!("{}/schema/validator", FRAMEWORK));
    }

    for kind in KINDS {
        let go = go_kind(kind);
        let kind_caps = caps.for_kind(kind);
        if kind_caps.default {
            imports.insert(format!("{}/resource/schema/{}default", FRAMEWORK, go.prefix));
        }
        if kind_caps.plan_modifiers() {
            imports.insert(format!("{}/resource/schema/{}planmodifier", FRAMEWORK, go.prefix));
        }
        if kind_caps.validators {
            imports.insert(format!("{}/{}validator", FRAMEWORK_VALIDATORS, go.prefix));
        }
    }

    imports
}

/// Quote `s` as a Go interpreted string literal
pub fn go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    generator: &'a str,
    display_name: String,
    entity: &'a str,
    header: HeaderView<'a>,
    description: &'a str,
    markdown_description: &'a str,
    imports: BTreeSet<String>,
    attributes: Vec<AttributeView<'a>>,
    mappings: Vec<MappingView<'a>>,
}

#[derive(Serialize)]
struct HeaderView<'a> {
    model_name: &'a str,
    schema_func_name: &'a str,
    mapping_name: &'a str,
}

#[derive(Serialize)]
struct AttributeView<'a> {
    model_name: &'a str,
    attr_name: &'a str,
    model_type: String,
    schema_type: String,
    required: bool,
    optional: bool,
    computed: bool,
    sensitive: bool,
    description: &'a str,
    markdown_description: &'a str,
    element_type: Option<&'static str>,
    default: Option<String>,
    validator_type: String,
    validators: Vec<String>,
    plan_modifier_type: String,
    plan_modifiers: Vec<String>,
}

#[derive(Serialize)]
struct MappingView<'a> {
    attr_name: &'a str,
    api_name: &'a str,
}

impl<'a> AttributeView<'a> {
    fn new(attr: &'a AttributeSpec) -> Self {
        let go = go_kind(attr.kind);

        let default = attr.default.as_ref().map(|d| match d {
            DefaultClause::String(s) => format!("stringdefault.StaticString({})", go_string(s)),
            DefaultClause::Int64(n) => format!("int64default.StaticInt64({})", n),
            DefaultClause::Bool(b) => format!("booldefault.StaticBool({})", b),
        });

        let validators = match &attr.validators {
            Some(Validators::OneOf(values)) => {
                let quoted: Vec<String> = values.iter().map(|v| go_string(v)).collect();
                vec![format!("{}validator.OneOf({})", go.prefix, quoted.join(", "))]
            }
            Some(Validators::Between { min, max }) => {
                vec![format!("{}validator.Between({}, {})", go.prefix, min, max)]
            }
            None => Vec::new(),
        };

        let mut plan_modifiers = Vec::new();
        if attr.state_for_unknown {
            plan_modifiers.push(format!("{}planmodifier.UseStateForUnknown()", go.prefix));
        }
        if attr.requires_replace {
            plan_modifiers.push(format!("{}planmodifier.RequiresReplace()", go.prefix));
        }

        Self {
            model_name: &attr.model_name,
            attr_name: &attr.attr_name,
            model_type: format!("types.{}", go.name),
            schema_type: format!("schema.{}Attribute", go.name),
            required: attr.presence.required(),
            optional: attr.presence.optional(),
            computed: attr.presence.computed(),
            sensitive: attr.sensitive,
            description: &attr.description,
            markdown_description: &attr.markdown_description,
            element_type: (attr.kind == ScalarKind::ListOfString).then_some("types.StringType"),
            default,
            validator_type: format!("validator.{}", go.name),
            validators,
            plan_modifier_type: format!("planmodifier.{}", go.name),
            plan_modifiers,
        }
    }
}

/// A file written by the emitter
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Output path
    pub path: PathBuf,
    /// Entity kind
    pub kind: EntityKind,
    /// Connector code
    pub code: String,
    /// Number of schema attributes
    pub attribute_count: usize,
    /// SHA-256 of the written content
    pub hash: String,
    /// Size of the written content in bytes
    pub size: usize,
}

/// Renders connector models into Go source
pub struct Emitter {
    env: Environment<'static>,
}

impl Emitter {
    /// Create an emitter with the built-in template
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_filter("go_string", go_string);
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }

    /// `<output_dir>/<entity>_<code>.go`
    pub fn output_path(output_dir: &Path, kind: EntityKind, code: &str) -> PathBuf {
        output_dir.join(format!("{}_{}.{}", kind, code, OUTPUT_EXTENSION))
    }

    /// Render the unformatted Go source for `model`
    pub fn render(&self, model: &ConnectorModel) -> Result<String> {
        let context = TemplateContext {
            generator: GENERATOR_NAME,
            display_name: model.display_name.replace(['\n', '\r'], " "),
            entity: model.kind.as_str(),
            header: HeaderView {
                model_name: &model.header.model_name,
                schema_func_name: &model.header.schema_func_name,
                mapping_name: &model.header.mapping_name,
            },
            description: &model.description,
            markdown_description: &model.markdown_description,
            imports: imports(&model.capabilities),
            attributes: model.attributes.iter().map(AttributeView::new).collect(),
            mappings: model
                .field_mappings()
                .map(|(attr_name, api_name)| MappingView { attr_name, api_name })
                .collect(),
        };

        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(&context)?)
    }

    /// Render, format and write `model` below `output_dir`
    ///
    /// When the formatter fails the raw draft is written next to the target
    /// as `<file>.unformatted` and the target itself is not created.
    pub async fn emit(
        &self,
        model: &ConnectorModel,
        output_dir: &Path,
        formatter: &dyn Formatter,
    ) -> Result<GeneratedFile> {
        let path = Self::output_path(output_dir, model.kind, &model.code);
        let draft_path = unformatted_path(&path);
        let rendered = self.render(model)?;

        std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let formatted = match formatter.format(&rendered).await {
            Ok(formatted) => formatted,
            Err(diagnostic) => {
                write_file(&draft_path, &rendered)?;
                // Output from an earlier run no longer matches the configuration.
                remove_stale(&path)?;
                tracing::warn!(
                    "{} rejected {}; draft saved to {}",
                    formatter.name(),
                    path.display(),
                    draft_path.display()
                );
                return Err(Error::Format {
                    path,
                    diagnostic: diagnostic.0,
                });
            }
        };

        write_file(&path, &formatted)?;
        remove_stale(&draft_path)?;

        let hash = hex::encode(Sha256::digest(formatted.as_bytes()));
        tracing::info!("Generated {}", path.display());

        Ok(GeneratedFile {
            path,
            kind: model.kind,
            code: model.code.clone(),
            attribute_count: model.attributes.len(),
            hash,
            size: formatted.len(),
        })
    }
}

/// `<path>.unformatted`
pub fn unformatted_path(path: &Path) -> PathBuf {
    let mut draft = path.as_os_str().to_owned();
    draft.push(".unformatted");
    PathBuf::from(draft)
}

/// Remove `path` if it exists
fn remove_stale(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{CommandFormatter, NoopFormatter};
    use crate::modeler::Modeler;
    use schemagen_core::ConnectorSpec;
    use serde_json::json;

    fn postgres_model() -> ConnectorModel {
        let spec: ConnectorSpec = serde_json::from_value(json!({
            "display_name": "PostgreSQL",
            "config": [
                {"name": "database.hostname.user.defined", "user_defined": true, "required": true,
                 "display_name": "DB Host", "value": {"control": "string"}},
                {"name": "database.password", "user_defined": true, "required": true,
                 "value": {"control": "password"}},
                {"name": "snapshot.mode", "user_defined": true, "display_name": "Mode",
                 "value": {"control": "one-select", "raw_values": ["initial", "never"], "default": "initial"}},
                {"name": "streamkap.snapshot.parallelism", "user_defined": true,
                 "value": {"control": "slider", "min": 1, "max": 10, "default": 1}},
                {"name": "database.include.list", "user_defined": true, "set_once": true,
                 "value": {"control": "string"}}
            ]
        }))
        .unwrap();
        Modeler::new(EntityKind::Source, "postgresql")
            .model(&spec)
            .unwrap()
    }

    /// Package names referenced after the import block
    fn body(code: &str) -> &str {
        let end = code.find("\n)\n").unwrap();
        &code[end..]
    }

    #[test]
    fn test_go_string_escaping() {
        assert_eq!(go_string("plain"), "\"plain\"");
        assert_eq!(go_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(go_string("a\\b\nc"), "\"a\\\\b\\nc\"");
        assert_eq!(go_string("\u{1}"), "\"\\u0001\"");
        assert_eq!(go_string("`code`"), "\"`code`\"");
    }

    #[test]
    fn test_output_path() {
        let path = Emitter::output_path(Path::new("out"), EntityKind::Destination, "snowflake");
        assert_eq!(path, Path::new("out/destination_snowflake.go"));
        assert_eq!(
            unformatted_path(&path),
            Path::new("out/destination_snowflake.go.unformatted")
        );
    }

    #[test]
    fn test_render_anchors_in_order() {
        let code = Emitter::new().unwrap().render(&postgres_model()).unwrap();

        assert!(code.starts_with("// Code generated by schemagen. DO NOT EDIT.\n"));
        let anchors = [
            "package generated",
            "import (",
            "type SourcePostgresqlModel struct {",
            "func SourcePostgresqlSchema() schema.Schema {",
            "var SourcePostgresqlFieldMappings = map[string]string{",
        ];
        let mut last = 0;
        for anchor in anchors {
            let pos = code.find(anchor).unwrap_or_else(|| panic!("missing {anchor}"));
            assert!(pos > last, "{anchor} out of order");
            last = pos;
        }
    }

    #[test]
    fn test_render_attributes() {
        let code = Emitter::new().unwrap().render(&postgres_model()).unwrap();

        assert!(code.contains("\tID types.String `tfsdk:\"id\"`"));
        assert!(code.contains("\tDatabaseHostname types.String `tfsdk:\"database_hostname\"`"));
        assert!(code.contains("\tStreamkapSnapshotParallelism types.Int64"));
        assert!(code.contains("stringplanmodifier.UseStateForUnknown()"));
        assert!(code.contains("stringdefault.StaticString(\"initial\")"));
        assert!(code.contains("stringvalidator.OneOf(\"initial\", \"never\")"));
        assert!(code.contains("int64default.StaticInt64(1)"));
        assert!(code.contains("int64validator.Between(1, 10)"));
        assert!(code.contains("stringplanmodifier.RequiresReplace()"));
        assert!(code.contains("Sensitive: true,"));
        assert!(code.contains("MarkdownDescription: \"Mode Defaults to `initial`. Valid values: `initial`, `never`.\""));
    }

    #[test]
    fn test_mapping_table_skips_synthetic_attributes() {
        let code = Emitter::new().unwrap().render(&postgres_model()).unwrap();
        let table = &code[code.find("FieldMappings = map").unwrap()..];

        assert!(table.contains("\t\"database_hostname\": \"database.hostname.user.defined\",\n"));
        assert!(table.contains("\t\"snapshot_mode\": \"snapshot.mode\",\n"));
        assert!(!table.contains("\"id\""));
        assert!(!table.contains("\"connector\""));
        assert_eq!(table.matches(": \"").count(), 5);
    }

    #[test]
    fn test_imports_are_sorted_and_minimal() {
        let model = postgres_model();
        let code = Emitter::new().unwrap().render(&model).unwrap();
        let listed = imports(&model.capabilities);

        let expected: BTreeSet<String> = [
            "github.com/hashicorp/terraform-plugin-framework-validators/int64validator",
            "github.com/hashicorp/terraform-plugin-framework-validators/stringvalidator",
            "github.com/hashicorp/terraform-plugin-framework/resource/schema",
            "github.com/hashicorp/terraform-plugin-framework/resource/schema/int64default",
            "github.com/hashicorp/terraform-plugin-framework/resource/schema/planmodifier",
            "github.com/hashicorp/terraform-plugin-framework/resource/schema/stringdefault",
            "github.com/hashicorp/terraform-plugin-framework/resource/schema/stringplanmodifier",
            "github.com/hashicorp/terraform-plugin-framework/schema/validator",
            "github.com/hashicorp/terraform-plugin-framework/types",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(listed, expected);

        for import in &listed {
            let package = import.rsplit('/').next().unwrap();
            assert!(
                body(&code).contains(&format!("{}.", package)),
                "{import} is imported but unused"
            );
        }

        let block: Vec<&str> = code
            .lines()
            .skip_while(|l| *l != "import (")
            .skip(1)
            .take_while(|l| *l != ")")
            .collect();
        let mut sorted = block.clone();
        sorted.sort();
        assert_eq!(block, sorted);
    }

    #[test]
    fn test_bare_connector_imports() {
        let spec = ConnectorSpec::from_json(r#"{"display_name": "Bare", "config": []}"#).unwrap();
        let model = Modeler::new(EntityKind::Destination, "bare")
            .model(&spec)
            .unwrap();
        let listed: Vec<String> = imports(&model.capabilities).into_iter().collect();
        assert_eq!(
            listed,
            vec![
                "github.com/hashicorp/terraform-plugin-framework/resource/schema",
                "github.com/hashicorp/terraform-plugin-framework/resource/schema/planmodifier",
                "github.com/hashicorp/terraform-plugin-framework/resource/schema/stringplanmodifier",
                "github.com/hashicorp/terraform-plugin-framework/types",
            ]
        );
    }

    #[test]
    fn test_list_attribute_has_element_type() {
        let spec = ConnectorSpec::from_json(
            r#"{"display_name": "S3", "config": [
                {"name": "columns", "user_defined": true,
                 "value": {"control": "multi-select", "default": ["a", "b"]}}
            ]}"#,
        )
        .unwrap();
        let model = Modeler::new(EntityKind::Destination, "s3").model(&spec).unwrap();
        let code = Emitter::new().unwrap().render(&model).unwrap();

        assert!(code.contains("\"columns\": schema.ListAttribute{"));
        assert!(code.contains("ElementType: types.StringType,"));
        assert!(code.contains("\tColumns types.List `tfsdk:\"columns\"`"));
        assert!(!code.contains("Default:"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let emitter = Emitter::new().unwrap();
        let first = emitter.render(&postgres_model()).unwrap();
        let second = Emitter::new().unwrap().render(&postgres_model()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/generated");
        let file = Emitter::new()
            .unwrap()
            .emit(&postgres_model(), &out, &NoopFormatter)
            .await
            .unwrap();

        assert_eq!(file.path, out.join("source_postgresql.go"));
        assert_eq!(file.attribute_count, 8);
        assert_eq!(file.hash.len(), 64);
        let written = std::fs::read_to_string(&file.path).unwrap();
        assert_eq!(written.len(), file.size);
        assert!(written.contains("SourcePostgresqlSchema"));
    }

    #[tokio::test]
    async fn test_emit_formatter_failure_writes_draft_only() {
        let dir = tempfile::tempdir().unwrap();
        let formatter =
            CommandFormatter::new("sh").with_args(["-c", "cat >/dev/null; echo 'syntax error' >&2; exit 1"]);

        let err = Emitter::new()
            .unwrap()
            .emit(&postgres_model(), dir.path(), &formatter)
            .await
            .unwrap_err();

        match err {
            Error::Format { path, diagnostic } => {
                assert_eq!(path, dir.path().join("source_postgresql.go"));
                assert_eq!(diagnostic, "syntax error");
            }
            other => panic!("Expected format error, got {other:?}"),
        }
        assert!(!dir.path().join("source_postgresql.go").exists());
        let draft = std::fs::read_to_string(dir.path().join("source_postgresql.go.unformatted")).unwrap();
        assert!(draft.starts_with("// Code generated by schemagen."));
    }

    #[tokio::test]
    async fn test_formatter_failure_removes_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = Emitter::new().unwrap();
        let target = dir.path().join("source_postgresql.go");

        emitter
            .emit(&postgres_model(), dir.path(), &NoopFormatter)
            .await
            .unwrap();
        assert!(target.exists());

        let failing = CommandFormatter::new("sh").with_args(["-c", "cat >/dev/null; exit 1"]);
        let err = emitter
            .emit(&postgres_model(), dir.path(), &failing)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Format { .. }));
        assert!(!target.exists());
        assert!(dir.path().join("source_postgresql.go.unformatted").exists());
    }

    #[tokio::test]
    async fn test_successful_emit_removes_stale_draft() {
        let dir = tempfile::tempdir().unwrap();
        let draft = dir.path().join("source_postgresql.go.unformatted");
        std::fs::write(&draft, "old").unwrap();

        Emitter::new()
            .unwrap()
            .emit(&postgres_model(), dir.path(), &CommandFormatter::new("cat"))
            .await
            .unwrap();

        assert!(!draft.exists());
        assert!(dir.path().join("source_postgresql.go").exists());
    }
}
