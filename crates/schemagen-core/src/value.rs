//! Value metadata of a config entry
//!
//! The `value` object is loosely typed on the wire: `default` may be a
//! string, number, boolean or list, and `raw_values` may mix element types.
//! The types here keep the original shape and normalize it on access.

use serde::{Deserialize, Deserializer, Serialize};

use crate::control::Control;
use crate::error::{Error, Result};

/// Per-field value metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueObject {
    /// UI control, drives the attribute type
    pub control: Control,

    /// Whether the value is supplied (`raw`) or computed by the backend (`dynamic`)
    #[serde(rename = "type", default)]
    pub value_type: ValueType,

    /// Default value; JSON `null` is treated as absent
    #[serde(default)]
    pub default: Option<DefaultValue>,

    /// Allowed options for select controls
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_values: Vec<RawValue>,

    /// Slider lower bound
    #[serde(default)]
    pub min: Option<f64>,

    /// Slider upper bound
    #[serde(default)]
    pub max: Option<f64>,

    /// Slider increment
    #[serde(default)]
    pub step: Option<f64>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<serde_json::Value>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<serde_json::Value>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<serde_json::Value>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiline: Option<serde_json::Value>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<serde_json::Value>,

    /// Backend function computing a dynamic value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<serde_json::Value>,

    /// Preserved, not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<serde_json::Value>,
}

/// Deserialize JSON `null` the same as an absent key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Origin of a field's value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Supplied as-is by the user
    #[default]
    Raw,
    /// Computed by the backend
    Dynamic,
}

/// A `default` as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// `true` / `false`
    Bool(bool),
    /// Integral number
    Int(i64),
    /// Fractional (or out-of-range) number
    Float(f64),
    /// String
    String(String),
    /// List, as used by multi-select controls
    List(Vec<serde_json::Value>),
    /// Object
    Object(serde_json::Map<String, serde_json::Value>),
}

impl DefaultValue {
    fn describe(&self) -> String {
        match self {
            DefaultValue::Bool(b) => format!("boolean {}", b),
            DefaultValue::Int(n) => format!("integer {}", n),
            DefaultValue::Float(n) => format!("number {}", n),
            DefaultValue::String(s) => format!("string {:?}", s),
            DefaultValue::List(_) => "list".to_string(),
            DefaultValue::Object(_) => "object".to_string(),
        }
    }
}

/// One element of `raw_values`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// `true` / `false`
    Bool(bool),
    /// Integral number
    Int(i64),
    /// Fractional number
    Float(f64),
    /// String
    String(String),
}

impl RawValue {
    /// Render the option the way it is displayed and validated
    pub fn as_string(&self) -> String {
        match self {
            RawValue::Bool(b) => b.to_string(),
            RawValue::Int(n) => n.to_string(),
            RawValue::Float(n) => n.to_string(),
            RawValue::String(s) => s.clone(),
        }
    }
}

impl ValueObject {
    /// Create a value object for the given control with every optional field absent
    pub fn new(control: Control) -> Self {
        Self {
            control,
            value_type: ValueType::Raw,
            default: None,
            raw_values: Vec::new(),
            min: None,
            max: None,
            step: None,
            readonly: None,
            placeholder: None,
            rows: None,
            multiline: None,
            validation: None,
            function_name: None,
            dependencies: None,
        }
    }

    /// Whether a non-null `default` is present
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The default rendered as a string
    ///
    /// Integers render without a decimal point and booleans as `true`/`false`.
    pub fn default_as_string(&self) -> Result<Option<String>> {
        let Some(default) = &self.default else {
            return Ok(None);
        };
        match default {
            DefaultValue::String(s) => Ok(Some(s.clone())),
            DefaultValue::Int(n) => Ok(Some(n.to_string())),
            DefaultValue::Float(n) => Ok(Some(n.to_string())),
            DefaultValue::Bool(b) => Ok(Some(b.to_string())),
            other => Err(Error::Conversion {
                expected: "string",
                found: other.describe(),
            }),
        }
    }

    /// The default as a 64-bit integer
    ///
    /// Accepts integers, integral floats and strings holding an integer.
    pub fn default_as_i64(&self) -> Result<Option<i64>> {
        let Some(default) = &self.default else {
            return Ok(None);
        };
        let converted = match default {
            DefaultValue::Int(n) => Some(*n),
            DefaultValue::Float(n) => float_to_i64(*n),
            DefaultValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        converted.map(Some).ok_or_else(|| Error::Conversion {
            expected: "integer",
            found: default.describe(),
        })
    }

    /// The default as a boolean
    ///
    /// Accepts booleans and the strings `"true"` / `"false"`.
    pub fn default_as_bool(&self) -> Result<Option<bool>> {
        let Some(default) = &self.default else {
            return Ok(None);
        };
        let converted = match default {
            DefaultValue::Bool(b) => Some(*b),
            DefaultValue::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            DefaultValue::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        };
        converted.map(Some).ok_or_else(|| Error::Conversion {
            expected: "boolean",
            found: default.describe(),
        })
    }

    /// `raw_values` normalized to strings, in source order
    pub fn raw_values_as_strings(&self) -> Vec<String> {
        self.raw_values.iter().map(RawValue::as_string).collect()
    }

    /// Whether both slider bounds are present
    pub fn has_slider_range(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// Slider lower bound, 0 when absent
    ///
    /// Only meaningful for `slider` controls; the caller gates on the control.
    pub fn slider_min(&self) -> Result<i64> {
        bound_to_i64(self.min, 0, "min")
    }

    /// Slider upper bound, 0 when absent
    pub fn slider_max(&self) -> Result<i64> {
        bound_to_i64(self.max, 0, "max")
    }

    /// Slider increment, 1 when absent
    pub fn slider_step(&self) -> Result<i64> {
        bound_to_i64(self.step, 1, "step")
    }
}

fn float_to_i64(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

fn bound_to_i64(bound: Option<f64>, absent: i64, what: &str) -> Result<i64> {
    match bound {
        None => Ok(absent),
        Some(n) => float_to_i64(n).ok_or_else(|| Error::Conversion {
            expected: "integer",
            found: format!("slider {} {}", what, n),
        }),
    }
}
