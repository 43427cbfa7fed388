//! Connector discovery
//!
//! Connector configuration documents live in the backend checkout at
//! `app/<plural>/plugins/<code>/configuration.latest.json`.

use schemagen_codegen::EntityKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name of the current configuration document of a plugin
pub const CONFIG_FILE: &str = "configuration.latest.json";

/// A connector configuration found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredConnector {
    pub kind: EntityKind,
    /// Plugin directory name
    pub code: String,
    pub path: PathBuf,
}

/// `<backend>/app/<plural>/plugins`
pub fn plugins_dir(backend: &Path, kind: EntityKind) -> PathBuf {
    backend.join("app").join(kind.plural()).join("plugins")
}

/// Connectors of one kind, sorted by code
pub fn discover(backend: &Path, kind: EntityKind) -> Vec<DiscoveredConnector> {
    let dir = plugins_dir(backend, kind);
    if !dir.is_dir() {
        tracing::warn!("No {} plugins directory at {}", kind, dir.display());
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(2).max_depth(2).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != CONFIG_FILE {
            continue;
        }

        let code = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(str::to_string);
        match code {
            Some(code) => found.push(DiscoveredConnector {
                kind,
                code,
                path: entry.into_path(),
            }),
            None => tracing::warn!(
                "Skipping {}: plugin directory name is not valid UTF-8",
                entry.path().display()
            ),
        }
    }
    found.sort_by(|a, b| a.code.cmp(&b.code));

    tracing::debug!("Found {} {} connectors in {}", found.len(), kind, dir.display());
    found
}

/// Connectors of each kind in `kinds`, kinds in the given order
pub fn discover_all(backend: &Path, kinds: &[EntityKind]) -> Vec<DiscoveredConnector> {
    kinds.iter().flat_map(|kind| discover(backend, *kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(backend: &Path, plural: &str, code: &str) {
        let dir = backend.join("app").join(plural).join("plugins").join(code);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE), "{}").unwrap();
    }

    #[test]
    fn test_discover_sorted_by_code() {
        let dir = tempfile::tempdir().unwrap();
        plugin(dir.path(), "sources", "postgresql");
        plugin(dir.path(), "sources", "mysql");
        plugin(dir.path(), "sources", "db2");

        let codes: Vec<String> = discover(dir.path(), EntityKind::Source)
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["db2", "mysql", "postgresql"]);
    }

    #[test]
    fn test_discover_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        plugin(dir.path(), "destinations", "snowflake");
        let plugin_dir = plugins_dir(dir.path(), EntityKind::Destination);
        std::fs::write(plugin_dir.join("snowflake/configuration.v1.json"), "{}").unwrap();
        std::fs::create_dir_all(plugin_dir.join("empty")).unwrap();
        std::fs::write(plugin_dir.join(CONFIG_FILE), "{}").unwrap();

        let found = discover(dir.path(), EntityKind::Destination);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "snowflake");
        assert_eq!(found[0].kind, EntityKind::Destination);
        assert_eq!(found[0].path, plugin_dir.join("snowflake").join(CONFIG_FILE));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_plugin_dir_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        plugin(dir.path(), "sources", "postgresql");
        let bad = plugins_dir(dir.path(), EntityKind::Source).join(OsStr::from_bytes(b"bad\xff"));
        if std::fs::create_dir_all(&bad).is_err() {
            // Some filesystems refuse non-UTF-8 names outright.
            return;
        }
        std::fs::write(bad.join(CONFIG_FILE), "{}").unwrap();

        let codes: Vec<String> = discover(dir.path(), EntityKind::Source)
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["postgresql"]);
    }

    #[test]
    fn test_missing_plugins_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), EntityKind::Transform).is_empty());
    }

    #[test]
    fn test_discover_all_keeps_kind_order() {
        let dir = tempfile::tempdir().unwrap();
        plugin(dir.path(), "transforms", "map_filter");
        plugin(dir.path(), "sources", "postgresql");

        let found = discover_all(dir.path(), &EntityKind::ALL);
        let kinds: Vec<EntityKind> = found.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Source, EntityKind::Transform]);
    }
}
