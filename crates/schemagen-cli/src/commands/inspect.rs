//! Show the modeled attributes of one configuration file

use anyhow::{Context, Result};
use schemagen_codegen::{AttributeSpec, EntityKind, Modeler};
use schemagen_core::ConnectorSpec;
use std::path::Path;

/// Run the inspect command
pub fn run(file: &Path, kind: EntityKind, code: &str) -> Result<()> {
    let spec = ConnectorSpec::load(file).context("Failed to load connector configuration")?;
    let model = Modeler::new(kind, code)
        .model(&spec)
        .with_context(|| format!("Failed to model {} {}", kind, code))?;

    println!("{} ({} {})", model.header.schema_func_name, model.display_name, kind);
    for attr in &model.attributes {
        println!("{}", describe(attr));
    }

    Ok(())
}

/// `<attr_name>\t<kind>\t<presence>[\t<flags>]`
fn describe(attr: &AttributeSpec) -> String {
    let mut flags = Vec::new();
    if attr.sensitive {
        flags.push("sensitive".to_string());
    }
    if let Some(default) = &attr.default {
        flags.push(format!("default={}", default.literal()));
    }
    if attr.validators.is_some() {
        flags.push("validated".to_string());
    }
    if attr.requires_replace {
        flags.push("requires-replace".to_string());
    }
    if attr.state_for_unknown {
        flags.push("use-state-for-unknown".to_string());
    }

    let mut line = format!("{}\t{}\t{}", attr.attr_name, attr.kind, attr.presence);
    if !flags.is_empty() {
        line.push('\t');
        line.push_str(&flags.join(","));
    }
    line
}
