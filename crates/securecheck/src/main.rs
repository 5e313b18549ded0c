//! `securecheck` - CLI for the police post dashboard
//!
//! This binary parses a command, serves it as one dashboard request and
//! prints the resulting page as a table view or JSON.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use securecheck::cli::{Action, Cli, ConfigCommand, OutputFormat};
use securecheck::present::{render_json, render_text};
use securecheck::{handle, init_logging, Analysis, Config, Store};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let format = cli.format;

    match cli.command.into_action()? {
        Action::Dashboard(request) => {
            let store = Store::new(&config.store);
            debug!(database = %store.path().display(), "Serving request");
            let page = handle(&store, request);
            match format {
                OutputFormat::Table => print!("{}", render_text(&page, &config.display)),
                OutputFormat::Json => println!("{}", render_json(&page)?),
            }
        }
        Action::ListAnalyses => list_analyses(format)?,
        Action::Config(cmd) => handle_config(&config, cmd)?,
    }
    Ok(())
}

fn list_analyses(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = Analysis::ALL
                .iter()
                .map(|a| serde_json::json!({ "slug": a.slug(), "label": a.label() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Table => {
            println!("Available analyses");
            println!("==================");
            println!();
            println!("  {:<34} {}", "overview", securecheck::query::catalog::OVERVIEW_LABEL);
            for analysis in Analysis::ALL {
                println!("  {:<34} {}", analysis.slug(), analysis.label());
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Create if missing:  {}", config.store.create_if_missing);
                println!();
                println!("[Display]");
                println!("  Chart width:        {}", config.display.chart_width);
                println!(
                    "  Max rows:           {}",
                    if config.display.max_rows == 0 {
                        "unlimited".to_string()
                    } else {
                        config.display.max_rows.to_string()
                    }
                );
                println!("  Color:              {}", config.display.color);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
