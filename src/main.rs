//! Protein feature aggregation service.
//!
//! Answers `GET /?ensemblGeneId=<id>` with one JSON document describing the
//! gene's canonical protein-coding transcript: its protein and coding
//! sequences, InterPro domains, and somatic variants with observation counts.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                   FEATURE SERVICE                     │
//!                   │                                                       │
//!   Client Request  │  ┌─────────┐    ┌─────────┐    ┌──────────────┐      │
//!   ────────────────┼─▶│  http   │───▶│  cache  │───▶│   feature    │      │
//!                   │  │ server  │    │         │    │   service    │      │
//!                   │  └─────────┘    └─────────┘    └──────┬───────┘      │
//!                   │                                       │ 4 concurrent  │
//!                   │                                       ▼ fetches       │
//!                   │                               ┌──────────────┐       │     BioMart
//!                   │                               │   upstream   │◀──────┼──── Ensembl REST
//!                   │                               └──────┬───────┘       │
//!                   │                                       ▼               │
//!   Client Response │  ┌─────────┐    ┌─────────┐    ┌──────────────┐      │
//!   ◀───────────────┼──│document │◀───│  join   │◀───│  frequency   │      │
//!                   │  │ builder │    │ engine  │    │  enrichment  │      │
//!                   │  └─────────┘    └─────────┘    └──────────────┘      │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use feature_service::config::{load_config, validation::validate_config, ConfigError, ServiceConfig};
use feature_service::lifecycle::{self, Shutdown};
use feature_service::observability::logging;

#[derive(Parser)]
#[command(name = "feature-service")]
#[command(
    about = "Aggregates Ensembl, BioMart, and COSMIC data into protein feature documents",
    long_about = None
)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `frequencies.path`.
    #[arg(short, long)]
    frequencies: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServiceConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(path) = self.frequencies {
            config.frequencies.path = Some(path);
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "feature-service starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        fetch_timeout_secs = config.upstream.fetch_timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    let started = lifecycle::start(config).await?;
    tracing::info!(address = %started.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::shutdown_signal().await;
        shutdown.trigger();
    });

    started.server.run(started.listener, server_shutdown).await?;

    if let Some(cache) = started.cache {
        if let Err(e) = cache.save_to_file() {
            tracing::error!(error = %e, "Failed to persist feature cache");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
