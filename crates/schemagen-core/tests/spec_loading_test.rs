//! Integration tests for loading connector documents from disk
//!
//! Tests use temporary directories with real file fixtures to verify:
//! - A realistic document loads with every polymorphic shape
//! - IO and parse failures carry the file path

use schemagen_core::{Control, ConnectorSpec, DefaultValue, Error, ValueType};
use tempfile::TempDir;

const POSTGRES: &str = r#"
{
  "display_name": "PostgreSQL",
  "description": "Change data capture from PostgreSQL",
  "schema_levels": ["schema", "table"],
  "debezium_connector_name": "postgres",
  "serialisation": {"key": "json"},
  "config": [
    {
      "name": "database.hostname.user.defined",
      "user_defined": true,
      "required": true,
      "display_name": "Hostname",
      "value": {"control": "string"}
    },
    {
      "name": "database.password",
      "user_defined": true,
      "required": true,
      "encrypt": true,
      "value": {"control": "password"}
    },
    {
      "name": "snapshot.mode",
      "user_defined": true,
      "display_name": "Snapshot Mode",
      "value": {"control": "one-select", "raw_values": ["initial", "never"], "default": "initial"}
    },
    {
      "name": "streamkap.snapshot.parallelism",
      "user_defined": true,
      "value": {"control": "slider", "min": 1, "max": 10, "step": 1, "default": 1}
    },
    {
      "name": "heartbeat.enabled",
      "user_defined": true,
      "value": {"control": "toggle", "default": false}
    },
    {
      "name": "database.server.name",
      "user_defined": false,
      "value": {"control": "string", "type": "dynamic", "function_name": "server_name"}
    }
  ]
}
"#;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_realistic_document() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "configuration.latest.json", POSTGRES);

    let spec = ConnectorSpec::load(&path).unwrap();
    assert_eq!(spec.display_name, "PostgreSQL");
    assert_eq!(
        spec.description.as_deref(),
        Some("Change data capture from PostgreSQL")
    );
    assert_eq!(spec.debezium_connector_name.as_deref(), Some("postgres"));
    assert_eq!(spec.entries.len(), 6);
    assert_eq!(spec.user_entries().count(), 5);

    let password = &spec.entries[1];
    assert!(password.encrypt);
    assert_eq!(password.value.control, Control::Password);

    let parallelism = &spec.entries[3];
    assert_eq!(parallelism.value.default, Some(DefaultValue::Int(1)));
    assert_eq!(parallelism.value.slider_max().unwrap(), 10);

    let toggle = &spec.entries[4];
    assert_eq!(toggle.value.default_as_bool().unwrap(), Some(false));

    let dynamic = &spec.entries[5];
    assert_eq!(dynamic.value.value_type, ValueType::Dynamic);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let err = ConnectorSpec::load(&path).unwrap_err();
    match err {
        Error::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected IO error, got {other:?}"),
    }
}

#[test]
fn test_malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "broken.json", r#"{"display_name": "X", "config": 3}"#);

    let err = ConnectorSpec::load(&path).unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }));
    assert!(err.to_string().contains("broken.json"));
}
