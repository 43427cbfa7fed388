//! CLI command implementations

use clap::ValueEnum;
use schemagen_codegen::EntityKind;

pub mod generate;
pub mod inspect;
pub mod list;

/// Entity kinds selected by `--entity-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityFilter {
    /// Source connectors
    Sources,
    /// Destination connectors
    Destinations,
    /// Transforms
    Transforms,
    /// Every kind
    All,
}

impl EntityFilter {
    /// Selected kinds in generation order
    pub fn kinds(self) -> Vec<EntityKind> {
        match self {
            EntityFilter::Sources => vec![EntityKind::Source],
            EntityFilter::Destinations => vec![EntityKind::Destination],
            EntityFilter::Transforms => vec![EntityKind::Transform],
            EntityFilter::All => EntityKind::ALL.to_vec(),
        }
    }
}
