//! Connector spec to attribute model
//!
//! Walks the user-defined entries of a [`ConnectorSpec`] and decides, per
//! entry, the attribute type, its required/optional/computed combination,
//! default, validators, plan modifiers and descriptions.

use std::collections::HashSet;

use schemagen_core::{ConfigEntry, ConnectorSpec, Control, DefaultValue, Error as CoreError};

use crate::error::Result;
use crate::model::*;
use crate::naming;

/// Backend entry whose role is taken by the synthesized `name` attribute of transforms
const TRANSFORM_NAME_ENTRY: &str = "transforms.name";

const SENSITIVE_NOTE: &str = "This value is sensitive and will not appear in logs or CLI output.";
const SENSITIVE_NOTE_MD: &str =
    "**Security:** This value is sensitive and will be masked in logs and CLI output.";

/// Builds a [`ConnectorModel`] for one connector
pub struct Modeler {
    kind: EntityKind,
    code: String,
}

impl Modeler {
    /// Create a modeler for the given entity kind and connector code
    pub fn new(kind: EntityKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
        }
    }

    /// Identifiers derived from the entity kind and connector code
    pub fn header(&self) -> SchemaHeader {
        let entity_cap = naming::title(self.kind.as_str());
        let code_cap = naming::pascal(&self.code);
        let prefix = format!("{}{}", entity_cap, code_cap);
        SchemaHeader {
            model_name: format!("{}Model", prefix),
            schema_func_name: format!("{}Schema", prefix),
            mapping_name: format!("{}FieldMappings", prefix),
            entity_cap,
            code_cap,
        }
    }

    /// Model every user-defined entry of `spec`
    pub fn model(&self, spec: &ConnectorSpec) -> Result<ConnectorModel> {
        let mut attributes = self.synthetic_attributes();
        let mut seen: HashSet<String> = attributes.iter().map(|a| a.attr_name.clone()).collect();
        let mut seen_fields: HashSet<String> =
            attributes.iter().map(|a| a.model_name.clone()).collect();

        for entry in spec.user_entries() {
            if self.kind == EntityKind::Transform && entry.name == TRANSFORM_NAME_ENTRY {
                tracing::debug!("Skipping {}: replaced by the name attribute", entry.name);
                continue;
            }

            let attr = self.convert_entry(entry)?;
            let invalid = |message: String| -> crate::error::Error {
                CoreError::Model {
                    entry: entry.name.clone(),
                    message,
                }
                .into()
            };

            if !seen.insert(attr.attr_name.clone()) {
                return Err(invalid(format!(
                    "attribute name '{}' is already in use",
                    attr.attr_name
                )));
            }
            // The struct field must be a distinct Go identifier.
            if !attr.model_name.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(invalid(format!(
                    "field name '{}' does not start with a letter",
                    attr.model_name
                )));
            }
            if !seen_fields.insert(attr.model_name.clone()) {
                return Err(invalid(format!(
                    "field name '{}' is already in use",
                    attr.model_name
                )));
            }
            attributes.push(attr);
        }

        for attr in &attributes {
            attr.check_invariants()?;
        }

        let capabilities = Capabilities::from_attributes(&attributes);
        let (description, markdown_description) = self.resource_descriptions(spec);

        tracing::debug!(
            "Modeled {} {} with {} attributes",
            self.kind,
            self.code,
            attributes.len()
        );

        Ok(ConnectorModel {
            kind: self.kind,
            code: self.code.clone(),
            display_name: spec.display_name.clone(),
            header: self.header(),
            description,
            markdown_description,
            attributes,
            capabilities,
        })
    }

    fn resource_descriptions(&self, spec: &ConnectorSpec) -> (String, String) {
        let mut description = format!("Manages a {} {}.", spec.display_name, self.kind);
        if let Some(extra) = spec.description.as_deref().filter(|d| !d.trim().is_empty()) {
            description.push(' ');
            description.push_str(extra.trim());
        }
        (description.clone(), description)
    }

    /// `id`, `name` and `connector` / `transform_type`, in that order
    fn synthetic_attributes(&self) -> Vec<AttributeSpec> {
        let entity = self.kind.as_str();
        let (type_attr, type_description) = match self.kind {
            EntityKind::Transform => ("transform_type", format!("Type of the {}", entity)),
            _ => ("connector", format!("Connector type of the {}", entity)),
        };

        vec![
            synthetic(
                "id",
                Presence::Computed,
                format!("Unique identifier for the {}", entity),
            ),
            synthetic("name", Presence::Required, format!("Name of the {}", entity)),
            synthetic(type_attr, Presence::Computed, type_description),
        ]
    }

    fn convert_entry(&self, entry: &ConfigEntry) -> Result<AttributeSpec> {
        let control = &entry.value.control;
        let kind = scalar_kind(control);
        let has_default = entry.value.has_default();

        let default = if has_default {
            default_clause(kind, entry)?
        } else {
            None
        };

        let presence = if entry.is_required() && !has_default {
            Presence::Required
        } else if default.is_some() {
            Presence::OptionalComputed
        } else {
            Presence::Optional
        };

        let sensitive = entry.encrypt || *control == Control::Password;
        if sensitive && kind != ScalarKind::String {
            return Err(CoreError::Model {
                entry: entry.name.clone(),
                message: format!("encrypted {} control is not a string", control),
            }
            .into());
        }

        let raw_values = entry.value.raw_values_as_strings();
        let valid_values = match control {
            Control::OneSelect if !raw_values.is_empty() => Some(raw_values),
            _ => None,
        };

        let validators = match control {
            Control::OneSelect => valid_values.clone().map(Validators::OneOf),
            Control::Slider if entry.value.has_slider_range() => Some(Validators::Between {
                min: entry.value.slider_min().map_err(|e| e.for_entry(&entry.name))?,
                max: entry.value.slider_max().map_err(|e| e.for_entry(&entry.name))?,
            }),
            _ => None,
        };

        let (description, markdown_description) =
            describe(entry, default.as_ref(), valid_values.as_deref(), sensitive);

        let attr_name = naming::attr_name(&entry.name);
        Ok(AttributeSpec {
            model_name: naming::pascal(&attr_name),
            attr_name,
            api_name: entry.name.clone(),
            kind,
            presence,
            sensitive,
            description,
            markdown_description,
            default,
            validators,
            state_for_unknown: false,
            requires_replace: entry.set_once,
        })
    }
}

fn synthetic(attr_name: &str, presence: Presence, description: String) -> AttributeSpec {
    AttributeSpec {
        model_name: naming::pascal(attr_name),
        attr_name: attr_name.to_string(),
        api_name: String::new(),
        kind: ScalarKind::String,
        presence,
        sensitive: false,
        markdown_description: description.clone(),
        description,
        default: None,
        validators: None,
        state_for_unknown: presence == Presence::Computed,
        requires_replace: false,
    }
}

/// Attribute type for a control; unknown controls are strings
pub fn scalar_kind(control: &Control) -> ScalarKind {
    match control {
        Control::String
        | Control::Password
        | Control::Textarea
        | Control::Json
        | Control::Datetime
        | Control::OneSelect
        | Control::Other(_) => ScalarKind::String,
        Control::Number | Control::Slider => ScalarKind::Int64,
        Control::Boolean | Control::Toggle => ScalarKind::Bool,
        Control::MultiSelect => ScalarKind::ListOfString,
    }
}

/// Literal default for an entry, or `None` when its type has no default clause
fn default_clause(kind: ScalarKind, entry: &ConfigEntry) -> Result<Option<DefaultClause>> {
    let value = &entry.value;
    if !kind.admits_default() || !value.control.is_known() {
        return Ok(None);
    }

    let clause = match kind {
        ScalarKind::String => match &value.default {
            // JSON editors carry structured defaults; embed them as compact JSON text.
            Some(structured @ (DefaultValue::List(_) | DefaultValue::Object(_)))
                if value.control == Control::Json =>
            {
                serde_json::to_string(structured)
                    .ok()
                    .map(DefaultClause::String)
            }
            _ => value
                .default_as_string()
                .map_err(|e| e.for_entry(&entry.name))?
                .map(DefaultClause::String),
        },
        ScalarKind::Int64 => value
            .default_as_i64()
            .map_err(|e| e.for_entry(&entry.name))?
            .map(DefaultClause::Int64),
        ScalarKind::Bool => value
            .default_as_bool()
            .map_err(|e| e.for_entry(&entry.name))?
            .map(DefaultClause::Bool),
        ScalarKind::ListOfString => None,
    };
    Ok(clause)
}

/// Plain and markdown descriptions with default, valid-values and sensitivity notes
fn describe(
    entry: &ConfigEntry,
    default: Option<&DefaultClause>,
    valid_values: Option<&[String]>,
    sensitive: bool,
) -> (String, String) {
    let base = [entry.description.as_deref(), entry.display_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default();

    let mut plain = vec![base.to_string()];
    let mut markdown = vec![base.to_string()];

    if let Some(default) = default {
        plain.push(format!("Defaults to {}.", default.literal()));
        markdown.push(format!("Defaults to `{}`.", default.bare_literal()));
    }

    if let Some(values) = valid_values {
        plain.push(format!("Valid values: {}.", values.join(", ")));
        let wrapped: Vec<String> = values.iter().map(|v| format!("`{}`", v)).collect();
        markdown.push(format!("Valid values: {}.", wrapped.join(", ")));
    }

    if sensitive {
        plain.push(SENSITIVE_NOTE.to_string());
        markdown.push(SENSITIVE_NOTE_MD.to_string());
    }

    (join_sentences(&plain), join_sentences(&markdown))
}

fn join_sentences(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
