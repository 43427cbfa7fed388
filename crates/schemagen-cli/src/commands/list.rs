//! List discovered connectors

use anyhow::Result;
use std::path::Path;

use super::EntityFilter;
use crate::discovery;

/// Run the list command
pub fn run(backend_path: &Path, filter: EntityFilter) -> Result<()> {
    tracing::info!("Discovering connectors in {}", backend_path.display());

    let connectors = discovery::discover_all(backend_path, &filter.kinds());
    for connector in &connectors {
        println!(
            "{}\t{}\t{}",
            connector.kind,
            connector.code,
            connector.path.display()
        );
    }

    tracing::info!("Found {} connectors", connectors.len());
    Ok(())
}
