//! `daylog config`: show, validate, and initialise the config file.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use daylog_config::{
    apply_all_defaults, load_and_prepare, load_config, resolve_config, validate, write_config,
    DaylogConfig,
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config (env substituted, defaults applied)
    Show,
    /// Check the config and list every error and warning
    Validate,
    /// Write a config file populated with defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_and_prepare(path).await?;
            print!("{}", serde_yaml::to_string(&config).context("Failed to render config")?);
            Ok(())
        }
        ConfigAction::Validate => validate_file(path).await,
        ConfigAction::Init { force } => {
            let config = apply_all_defaults(DaylogConfig::default());
            write_config(&config, path, force).await?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

async fn validate_file(path: &Path) -> Result<()> {
    println!("Checking {}", path.display());
    let config = resolve_config(load_config(path).await?)?;
    let report = validate(&config);

    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }

    if report.is_valid() {
        // Surfaces anything the per-field checks cannot see.
        config.writer_config()?;
        println!("✅ Config is valid.");
        Ok(())
    } else {
        anyhow::bail!("{} config error(s) found", report.errors.len())
    }
}
