//! Qwikipedia - wiki-style markdown encyclopedia
//!
//! Main entry point for the CLI and web server.

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, ServeArgs};
use qwikipedia::core::config::AppConfig;
use qwikipedia::core::store::{EntryStore, FileStore};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level.0))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn open_store(config: &AppConfig) -> Result<FileStore> {
    FileStore::open(&config.store.entries_dir, config.related).with_context(|| {
        format!(
            "Failed to open entries directory: {}",
            config.store.entries_dir.display()
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = AppConfig::resolve_path(cli.config.as_deref())?;
    let mut config = AppConfig::load(&config_path)?;

    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            if let Some(bind) = args.bind {
                config.server.bind = bind;
            }
            if let Some(entries) = args.entries {
                config.store.entries_dir = entries;
            }

            let store = open_store(&config)?;
            tracing::info!(
                "Starting Qwikipedia with entries from {}",
                store.root().display()
            );
            qwikipedia::web::serve(config.server.bind, Arc::new(store))
                .await
                .context("HTTP server failed")?;
        }
        Commands::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists, use --force to overwrite",
                    config_path.display()
                );
            }
            let config = AppConfig::default();
            config.save(&config_path)?;
            open_store(&config)?;
            println!("Wrote {}", config_path.display());
        }
        Commands::List => {
            for title in open_store(&config)?.list()? {
                println!("{}", title);
            }
        }
    }

    Ok(())
}
