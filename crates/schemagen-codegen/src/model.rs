//! Emission-ready connector model
//!
//! The modeler produces these types from a `ConnectorSpec`; the emitter
//! only reads them.

use std::fmt;
use std::str::FromStr;

use schemagen_core::Error as CoreError;

/// Kind of connector entity a schema is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Reads from an external system
    Source,
    /// Writes to an external system
    Destination,
    /// Rewrites records between a source and a destination
    Transform,
}

impl EntityKind {
    /// All entity kinds, in generation order
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Source,
        EntityKind::Destination,
        EntityKind::Transform,
    ];

    /// Singular lower-case name (`source`)
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Source => "source",
            EntityKind::Destination => "destination",
            EntityKind::Transform => "transform",
        }
    }

    /// Plural lower-case name, as used in backend directory names (`sources`)
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Source => "sources",
            EntityKind::Destination => "destinations",
            EntityKind::Transform => "transforms",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" | "sources" => Ok(EntityKind::Source),
            "destination" | "destinations" => Ok(EntityKind::Destination),
            "transform" | "transforms" => Ok(EntityKind::Transform),
            other => Err(format!("unknown entity kind '{}'", other)),
        }
    }
}

/// Target value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// String
    String,
    /// 64-bit integer
    Int64,
    /// Boolean
    Bool,
    /// List of strings
    ListOfString,
}

impl ScalarKind {
    /// Whether a literal default clause exists for this kind
    pub fn admits_default(&self) -> bool {
        !matches!(self, ScalarKind::ListOfString)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::String => "string",
            ScalarKind::Int64 => "int64",
            ScalarKind::Bool => "bool",
            ScalarKind::ListOfString => "list(string)",
        })
    }
}

/// Who supplies an attribute's value
///
/// These are the only legal required/optional/computed combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// `{required}`
    Required,
    /// `{optional}`
    Optional,
    /// `{optional, computed}`: the user may set it, otherwise a default applies
    OptionalComputed,
    /// `{computed}`: set by the backend only
    Computed,
}

impl Presence {
    /// Required flag
    pub fn required(&self) -> bool {
        matches!(self, Presence::Required)
    }

    /// Optional flag
    pub fn optional(&self) -> bool {
        matches!(self, Presence::Optional | Presence::OptionalComputed)
    }

    /// Computed flag
    pub fn computed(&self) -> bool {
        matches!(self, Presence::OptionalComputed | Presence::Computed)
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Presence::Required => "required",
            Presence::Optional => "optional",
            Presence::OptionalComputed => "optional+computed",
            Presence::Computed => "computed",
        })
    }
}

/// A literal default chosen for an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultClause {
    /// String literal
    String(String),
    /// Integer literal
    Int64(i64),
    /// Boolean literal
    Bool(bool),
}

impl DefaultClause {
    /// Kind the literal belongs to
    pub fn kind(&self) -> ScalarKind {
        match self {
            DefaultClause::String(_) => ScalarKind::String,
            DefaultClause::Int64(_) => ScalarKind::Int64,
            DefaultClause::Bool(_) => ScalarKind::Bool,
        }
    }

    /// Literal as written in plain descriptions (`"5432"`, `1`, `true`)
    pub fn literal(&self) -> String {
        match self {
            DefaultClause::String(s) => format!("\"{}\"", s),
            DefaultClause::Int64(n) => n.to_string(),
            DefaultClause::Bool(b) => b.to_string(),
        }
    }

    /// Literal without quoting, for markdown code spans
    pub fn bare_literal(&self) -> String {
        match self {
            DefaultClause::String(s) => s.clone(),
            DefaultClause::Int64(n) => n.to_string(),
            DefaultClause::Bool(b) => b.to_string(),
        }
    }
}

/// Value constraints of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validators {
    /// Value must be one of the listed strings
    OneOf(Vec<String>),
    /// Value must lie in the inclusive range
    Between {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },
}

/// A normalized schema attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    /// Go struct field name (`DatabaseHostname`)
    pub model_name: String,
    /// Terraform attribute name (`database_hostname`)
    pub attr_name: String,
    /// Backend field name; empty for synthesized attributes
    pub api_name: String,
    /// Value type
    pub kind: ScalarKind,
    /// Required/optional/computed combination
    pub presence: Presence,
    /// Whether the value is masked in plans and logs
    pub sensitive: bool,
    /// Plain-text description
    pub description: String,
    /// Markdown description
    pub markdown_description: String,
    /// Literal default
    pub default: Option<DefaultClause>,
    /// Value constraints
    pub validators: Option<Validators>,
    /// Keep the prior state when the planned value is unknown
    pub state_for_unknown: bool,
    /// Changing the value recreates the resource
    pub requires_replace: bool,
}

impl AttributeSpec {
    /// Check the cross-field rules every emitted attribute must satisfy
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        let violation = |message: &str| {
            Err(CoreError::Model {
                entry: self.entry_label().to_string(),
                message: message.to_string(),
            })
        };

        if let Some(default) = &self.default {
            if self.presence != Presence::OptionalComputed || self.state_for_unknown {
                return violation("a default requires an optional+computed attribute without state-for-unknown");
            }
            if default.kind() != self.kind {
                return violation("default literal does not match the attribute type");
            }
        }
        if self.requires_replace && self.presence == Presence::Computed {
            return violation("a computed-only attribute cannot require replacement");
        }
        if self.sensitive && self.kind != ScalarKind::String {
            return violation("only string attributes can be sensitive");
        }
        Ok(())
    }

    fn entry_label(&self) -> &str {
        if self.api_name.is_empty() {
            &self.attr_name
        } else {
            &self.api_name
        }
    }
}

/// Names derived from the entity kind and connector code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaHeader {
    /// Title-cased entity kind (`Source`)
    pub entity_cap: String,
    /// PascalCased connector code (`Postgresql`)
    pub code_cap: String,
    /// Model struct name (`SourcePostgresqlModel`)
    pub model_name: String,
    /// Schema function name (`SourcePostgresqlSchema`)
    pub schema_func_name: String,
    /// Field mapping table name (`SourcePostgresqlFieldMappings`)
    pub mapping_name: String,
}

/// Emission fragments needed by attributes of one scalar kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCapabilities {
    /// Some attribute has a default clause
    pub default: bool,
    /// Some attribute has validators
    pub validators: bool,
    /// Some attribute keeps state for unknown
    pub state_for_unknown: bool,
    /// Some attribute requires replacement
    pub requires_replace: bool,
}

impl KindCapabilities {
    /// Some attribute has a plan modifier
    pub fn plan_modifiers(&self) -> bool {
        self.state_for_unknown || self.requires_replace
    }
}

/// Summary of which emission fragments the output needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// String attributes
    pub string: KindCapabilities,
    /// Int64 attributes
    pub int64: KindCapabilities,
    /// Bool attributes
    pub bool: KindCapabilities,
    /// List attributes
    pub list: KindCapabilities,
    /// Some list attribute exists (needs the element type)
    pub has_list: bool,
}

impl Capabilities {
    /// Compute the capabilities from the attributes that will be emitted
    pub fn from_attributes(attributes: &[AttributeSpec]) -> Self {
        let mut caps = Capabilities::default();
        for attr in attributes {
            if attr.kind == ScalarKind::ListOfString {
                caps.has_list = true;
            }
            let kind = caps.for_kind_mut(attr.kind);
            kind.default |= attr.default.is_some();
            kind.validators |= attr.validators.is_some();
            kind.state_for_unknown |= attr.state_for_unknown;
            kind.requires_replace |= attr.requires_replace;
        }
        caps
    }

    /// Capabilities of one scalar kind
    pub fn for_kind(&self, kind: ScalarKind) -> &KindCapabilities {
        match kind {
            ScalarKind::String => &self.string,
            ScalarKind::Int64 => &self.int64,
            ScalarKind::Bool => &self.bool,
            ScalarKind::ListOfString => &self.list,
        }
    }

    fn for_kind_mut(&mut self, kind: ScalarKind) -> &mut KindCapabilities {
        match kind {
            ScalarKind::String => &mut self.string,
            ScalarKind::Int64 => &mut self.int64,
            ScalarKind::Bool => &mut self.bool,
            ScalarKind::ListOfString => &mut self.list,
        }
    }

    /// Some attribute of any kind has validators
    pub fn any_validators(&self) -> bool {
        self.kinds().any(|k| k.validators)
    }

    /// Some attribute of any kind has plan modifiers
    pub fn any_plan_modifiers(&self) -> bool {
        self.kinds().any(|k| k.plan_modifiers())
    }

    fn kinds(&self) -> impl Iterator<Item = &KindCapabilities> {
        [&self.string, &self.int64, &self.bool, &self.list].into_iter()
    }
}

/// Everything the emitter needs for one connector
#[derive(Debug, Clone)]
pub struct ConnectorModel {
    /// Entity kind
    pub kind: EntityKind,
    /// Connector code (`postgresql`)
    pub code: String,
    /// Human-readable connector name
    pub display_name: String,
    /// Derived identifiers
    pub header: SchemaHeader,
    /// Resource-level plain description
    pub description: String,
    /// Resource-level markdown description
    pub markdown_description: String,
    /// Attributes in emission order
    pub attributes: Vec<AttributeSpec>,
    /// Emission fragments in use
    pub capabilities: Capabilities,
}

impl ConnectorModel {
    /// Look up an attribute by its Terraform name
    pub fn attribute(&self, attr_name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.attr_name == attr_name)
    }

    /// `attr_name → api_name` pairs for attributes backed by a backend field
    pub fn field_mappings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|a| !a.api_name.is_empty())
            .map(|a| (a.attr_name.as_str(), a.api_name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(kind: ScalarKind, presence: Presence) -> AttributeSpec {
        AttributeSpec {
            model_name: "Field".to_string(),
            attr_name: "field".to_string(),
            api_name: "field".to_string(),
            kind,
            presence,
            sensitive: false,
            description: String::new(),
            markdown_description: String::new(),
            default: None,
            validators: None,
            state_for_unknown: false,
            requires_replace: false,
        }
    }

    #[test]
    fn test_presence_flags() {
        assert!(Presence::Required.required());
        assert!(!Presence::Required.optional());
        assert!(Presence::Optional.optional() && !Presence::Optional.computed());
        assert!(Presence::OptionalComputed.optional() && Presence::OptionalComputed.computed());
        assert!(Presence::Computed.computed() && !Presence::Computed.optional());
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("sources".parse::<EntityKind>(), Ok(EntityKind::Source));
        assert_eq!("Destination".parse::<EntityKind>(), Ok(EntityKind::Destination));
        assert_eq!("transform".parse::<EntityKind>(), Ok(EntityKind::Transform));
        assert!("pipeline".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_default_requires_optional_computed() {
        let mut attr = attribute(ScalarKind::String, Presence::Optional);
        attr.default = Some(DefaultClause::String("x".to_string()));
        assert!(attr.check_invariants().is_err());

        attr.presence = Presence::OptionalComputed;
        assert!(attr.check_invariants().is_ok());

        attr.state_for_unknown = true;
        assert!(attr.check_invariants().is_err());
    }

    #[test]
    fn test_default_kind_must_match() {
        let mut attr = attribute(ScalarKind::Int64, Presence::OptionalComputed);
        attr.default = Some(DefaultClause::Bool(true));
        assert!(attr.check_invariants().is_err());
    }

    #[test]
    fn test_sensitive_requires_string() {
        let mut attr = attribute(ScalarKind::Bool, Presence::Optional);
        attr.sensitive = true;
        let err = attr.check_invariants().unwrap_err();
        assert!(err.to_string().contains("only string attributes"));
    }

    #[test]
    fn test_computed_cannot_require_replace() {
        let mut attr = attribute(ScalarKind::String, Presence::Computed);
        attr.requires_replace = true;
        assert!(attr.check_invariants().is_err());
    }

    #[test]
    fn test_capabilities_from_attributes() {
        let mut with_default = attribute(ScalarKind::Int64, Presence::OptionalComputed);
        with_default.default = Some(DefaultClause::Int64(1));
        with_default.validators = Some(Validators::Between { min: 1, max: 10 });

        let mut replaced = attribute(ScalarKind::Bool, Presence::Optional);
        replaced.requires_replace = true;

        let list = attribute(ScalarKind::ListOfString, Presence::Optional);

        let caps = Capabilities::from_attributes(&[with_default, replaced, list]);
        assert!(caps.int64.default && caps.int64.validators);
        assert!(!caps.int64.plan_modifiers());
        assert!(caps.bool.requires_replace && caps.bool.plan_modifiers());
        assert!(caps.has_list);
        assert!(!caps.list.plan_modifiers());
        assert_eq!(caps.string, KindCapabilities::default());
        assert!(caps.any_validators());
        assert!(caps.any_plan_modifiers());
    }
}
