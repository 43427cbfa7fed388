//! schemagen CLI
//!
//! Generates Terraform provider schema files from the connector
//! configuration documents of a backend checkout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use schemagen_codegen::{EntityKind, FormatterConfig};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod discovery;

use commands::EntityFilter;

/// schemagen - Terraform schemas from connector configuration
#[derive(Parser)]
#[command(name = "schemagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schema files for every discovered connector
    Generate {
        /// Root of the backend checkout
        #[arg(long, env = "SCHEMAGEN_BACKEND_PATH")]
        backend_path: PathBuf,

        /// Directory generated files are written to
        #[arg(short, long, env = "SCHEMAGEN_OUTPUT", default_value = "generated")]
        output: PathBuf,

        /// Entity kinds to generate
        #[arg(long, value_enum, default_value_t = EntityFilter::All)]
        entity_type: EntityFilter,

        /// Formatter program (reads stdin, writes stdout)
        #[arg(long, env = "SCHEMAGEN_FORMATTER", default_value = "gofmt")]
        formatter: String,

        /// Write generated code without formatting it
        #[arg(long)]
        no_format: bool,
    },

    /// List discovered connectors
    List {
        /// Root of the backend checkout
        #[arg(long, env = "SCHEMAGEN_BACKEND_PATH")]
        backend_path: PathBuf,

        /// Entity kinds to list
        #[arg(long, value_enum, default_value_t = EntityFilter::All)]
        entity_type: EntityFilter,
    },

    /// Show the attributes a configuration file would generate
    Inspect {
        /// Connector configuration file
        file: PathBuf,

        /// Entity kind (source, destination or transform)
        #[arg(long, value_parser = parse_kind)]
        entity_type: EntityKind,

        /// Connector code (e.g. postgresql)
        #[arg(long)]
        code: String,
    },
}

fn parse_kind(s: &str) -> std::result::Result<EntityKind, String> {
    s.parse()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so `list` and `inspect` output stays clean.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            backend_path,
            output,
            entity_type,
            formatter,
            no_format,
        } => {
            let formatter = if no_format {
                FormatterConfig::Disabled
            } else {
                FormatterConfig::Command {
                    program: formatter,
                    args: Vec::new(),
                }
            };
            commands::generate::run(&backend_path, &output, entity_type, formatter).await?;
        }
        Commands::List {
            backend_path,
            entity_type,
        } => {
            commands::list::run(&backend_path, entity_type)?;
        }
        Commands::Inspect {
            file,
            entity_type,
            code,
        } => {
            commands::inspect::run(&file, entity_type, &code)?;
        }
    }

    Ok(())
}
