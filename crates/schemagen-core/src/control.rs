//! Control tags
//!
//! The `control` field of a value object names the UI widget the backend
//! renders for a field. It is the main input for choosing an attribute's type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// UI control of a config entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Control {
    /// Single-line text
    String,
    /// Masked text
    Password,
    /// Multi-line text
    Textarea,
    /// JSON document edited as text
    Json,
    /// Date/time picker
    Datetime,
    /// Numeric input
    Number,
    /// Bounded numeric slider
    Slider,
    /// Checkbox
    Boolean,
    /// Toggle switch
    Toggle,
    /// Single choice from `raw_values`
    OneSelect,
    /// Multiple choices from `raw_values`
    MultiSelect,
    /// Any tag this crate does not know; treated as a plain string
    Other(String),
}

impl Control {
    /// Wire tag of this control
    pub fn as_str(&self) -> &str {
        match self {
            Control::String => "string",
            Control::Password => "password",
            Control::Textarea => "textarea",
            Control::Json => "json",
            Control::Datetime => "datetime",
            Control::Number => "number",
            Control::Slider => "slider",
            Control::Boolean => "boolean",
            Control::Toggle => "toggle",
            Control::OneSelect => "one-select",
            Control::MultiSelect => "multi-select",
            Control::Other(tag) => tag,
        }
    }

    /// Whether the tag was recognized
    pub fn is_known(&self) -> bool {
        !matches!(self, Control::Other(_))
    }
}

impl From<String> for Control {
    fn from(s: String) -> Self {
        match s.as_str() {
            "string" => Control::String,
            "password" => Control::Password,
            "textarea" => Control::Textarea,
            "json" => Control::Json,
            "datetime" => Control::Datetime,
            "number" => Control::Number,
            "slider" => Control::Slider,
            "boolean" => Control::Boolean,
            "toggle" => Control::Toggle,
            "one-select" => Control::OneSelect,
            "multi-select" => Control::MultiSelect,
            _ => Control::Other(s),
        }
    }
}

impl From<Control> for String {
    fn from(control: Control) -> Self {
        control.as_str().to_string()
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
