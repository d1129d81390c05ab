//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the frequency table
//! - Start the metrics exporter
//! - Build the upstream client, feature service, and cache
//! - Bind the listener last
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::cache::FeatureCache;
use crate::config::{CacheConfig, FrequencyConfig, ServiceConfig};
use crate::feature::FeatureService;
use crate::frequency::{FrequencyError, FrequencyTable};
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::upstream::{EnsemblUpstream, UpstreamError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("frequency table: {0}")]
    Frequencies(#[from] FrequencyError),

    #[error("upstream client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("feature cache '{path}': {source}")]
    Cache {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A service ready to run.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub cache: Option<FeatureCache>,
}

impl Started {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Initialize every subsystem from a validated config and bind the listener.
pub async fn start(config: ServiceConfig) -> Result<Started, StartupError> {
    let frequencies = Arc::new(load_frequencies(&config.frequencies)?);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let source = EnsemblUpstream::new(&config.upstream, &config.biomart)?;
    let service = FeatureService::new(
        source,
        frequencies,
        Duration::from_secs(config.upstream.fetch_timeout_secs),
    );
    let cache = load_cache(&config.cache)?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let server = HttpServer::new(config, service, cache.clone());
    Ok(Started {
        server,
        listener,
        cache,
    })
}

/// The configured frequency table, or an empty one when none is configured.
pub fn load_frequencies(config: &FrequencyConfig) -> Result<FrequencyTable, FrequencyError> {
    match &config.path {
        Some(path) => FrequencyTable::load(Path::new(path)),
        None => {
            tracing::warn!("No frequency table configured; variant scores will be omitted");
            Ok(FrequencyTable::new())
        }
    }
}

/// The feature cache, restored from its persistence file when one is set.
pub fn load_cache(config: &CacheConfig) -> Result<Option<FeatureCache>, StartupError> {
    if !config.enabled {
        return Ok(None);
    }
    let cache = match &config.persistence_path {
        Some(path) => FeatureCache::load_from_file(path).map_err(|source| StartupError::Cache {
            path: path.clone(),
            source,
        })?,
        None => FeatureCache::new(None),
    };
    Ok(Some(cache))
}
