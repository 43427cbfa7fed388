//! Generate schema files for discovered connectors

use anyhow::{Context, Result};
use schemagen_codegen::{FormatterConfig, GenerateOptions, Generator};
use std::path::Path;

use super::EntityFilter;
use crate::discovery;

/// Run the generate command
///
/// A failing connector is logged and skipped; the command fails at the end
/// if any connector failed.
pub async fn run(
    backend_path: &Path,
    output_dir: &Path,
    filter: EntityFilter,
    formatter: FormatterConfig,
) -> Result<()> {
    tracing::info!("Discovering connectors in {}", backend_path.display());

    let connectors = discovery::discover_all(backend_path, &filter.kinds());
    if connectors.is_empty() {
        tracing::warn!("No connectors found in {}", backend_path.display());
        return Ok(());
    }

    let options = GenerateOptions {
        output_dir: output_dir.to_path_buf(),
        formatter,
    };
    let generator = Generator::new(options).context("Failed to initialize generator")?;

    let mut failed = 0;
    for connector in &connectors {
        let result = generator
            .generate_file(&connector.path, connector.kind, &connector.code)
            .await
            .with_context(|| format!("Failed to generate {} {}", connector.kind, connector.code));

        match result {
            Ok(file) => {
                tracing::info!(
                    "  ✓ {} ({} attributes, {} bytes, hash: {}...)",
                    file.path.display(),
                    file.attribute_count,
                    file.size,
                    &file.hash[..8]
                );
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("  ✗ {:#}", e);
            }
        }
    }

    tracing::info!(
        "Generated {} of {} schemas into {}",
        connectors.len() - failed,
        connectors.len(),
        output_dir.display()
    );

    if failed > 0 {
        anyhow::bail!("{} of {} connectors failed", failed, connectors.len());
    }
    Ok(())
}
