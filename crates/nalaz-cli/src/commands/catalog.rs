//! Catalog command - inspect and extend the analyte catalog.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use nalaz_core::NalazConfig;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List the configured catalog entries
    List,

    /// Add analyte names to the user catalog
    Add {
        /// Analyte names; each becomes its own sole alias
        #[arg(required = true)]
        names: Vec<String>,
    },
}

pub fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(super::default_config_path);

    match args.command {
        CatalogCommand::List => {
            let config = super::load_config(config_path)?;
            let catalog = config.catalog();

            for entry in catalog.entries() {
                println!("{:<20} {}", entry.name, entry.aliases.join(", "));
            }
            println!();
            println!("{} {} entries", style("ℹ").blue(), catalog.len());
        }
        CatalogCommand::Add { names } => {
            let mut config = if path.exists() {
                NalazConfig::from_file(&path)?
            } else {
                NalazConfig::default()
            };

            let mut added = 0usize;
            for name in &names {
                let name = name.trim();
                if !name.is_empty()
                    && !config.catalog.extra_analytes.iter().any(|n| n == name)
                {
                    config.catalog.extra_analytes.push(name.to_string());
                    added += 1;
                }
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            config.save(&path)?;

            println!(
                "{} {} analytes added, catalog saved to {}",
                style("✓").green(),
                added,
                path.display()
            );
        }
    }

    Ok(())
}
