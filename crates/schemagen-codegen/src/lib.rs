//! schemagen Code Generation
//!
//! This crate turns a connector configuration document into a Go source file
//! for the Terraform plugin framework.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌──────────┐     ┌─────────┐     ┌─────────┐
//! │  JSON   │────▶│  Model   │────▶│   Go    │────▶│ gofmt'd │
//! │ Config  │     │(Modeler) │     │ (Emit)  │     │  file   │
//! └─────────┘     └──────────┘     └─────────┘     └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use schemagen_codegen::{EntityKind, GenerateOptions, Generator};
//!
//! let generator = Generator::new(GenerateOptions::default())?;
//! let file = generator
//!     .generate_file("plugins/postgresql/configuration.latest.json", EntityKind::Source, "postgresql")
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod emitter;
pub mod error;
pub mod formatter;
pub mod generator;
pub mod model;
pub mod modeler;
pub mod naming;

pub use emitter::{Emitter, GeneratedFile};
pub use error::{Error, Result};
pub use formatter::{CommandFormatter, Formatter, NoopFormatter};
pub use generator::{FormatterConfig, GenerateOptions, Generator};
pub use model::{AttributeSpec, Capabilities, ConnectorModel, EntityKind, ScalarKind};
pub use modeler::Modeler;
