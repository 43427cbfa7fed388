//! schemagen Core Library
//!
//! This crate reads the connector configuration documents published by the
//! backend and exposes them as typed values:
//! - Document and entry parsing ([`ConnectorSpec`], [`ConfigEntry`])
//! - Polymorphic value metadata ([`ValueObject`], [`DefaultValue`], [`RawValue`])
//! - Control tags ([`Control`])
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌─────────────┐
//! │    JSON     │────▶│ ConnectorSpec │────▶│  Accessors  │
//! │  document   │     │   (parsed)    │     │ (normalized)│
//! └─────────────┘     └───────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use schemagen_core::ConnectorSpec;
//!
//! let spec = ConnectorSpec::load("plugins/postgresql/configuration.latest.json")?;
//! for entry in spec.user_entries() {
//!     println!("{}: {:?}", entry.name, entry.value.control);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod control;
pub mod error;
pub mod spec;
pub mod value;

pub use control::Control;
pub use error::{Error, Result};
pub use spec::{Condition, ConditionOperator, ConfigEntry, ConnectorSpec, KafkaConfig};
pub use value::{DefaultValue, RawValue, ValueObject, ValueType};
