//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the feature service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ensembl REST endpoint and shared HTTP client settings.
    pub upstream: UpstreamConfig,

    /// BioMart endpoint and query constants.
    pub biomart: BioMartConfig,

    /// Variant frequency table.
    pub frequencies: FrequencyConfig,

    /// Feature document cache.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:2999").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:2999".to_string(),
        }
    }
}

/// Upstream HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the Ensembl REST API.
    pub ensembl_rest_url: String,

    /// User-Agent sent to all upstreams.
    pub user_agent: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Deadline for each individual fetch in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            ensembl_rest_url: "https://rest.ensembl.org".to_string(),
            user_agent: concat!("feature-service/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 10,
            fetch_timeout_secs: 60,
        }
    }
}

/// BioMart query configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BioMartConfig {
    /// martservice endpoint.
    pub url: String,

    /// `virtualSchemaName` of the query.
    pub virtual_schema: String,

    /// Dataset holding gene/transcript/InterPro attributes.
    pub gene_dataset: String,

    /// Dataset holding somatic variant attributes.
    pub variant_dataset: String,

    /// Only transcripts of this biotype are annotated.
    pub transcript_biotype: String,

    /// Only variants from this source are returned.
    pub variation_source: String,
}

impl Default for BioMartConfig {
    fn default() -> Self {
        Self {
            url: "http://useast.ensembl.org/biomart/martservice".to_string(),
            virtual_schema: "default".to_string(),
            gene_dataset: "hsapiens_gene_ensembl".to_string(),
            variant_dataset: "hsapiens_snp_som".to_string(),
            transcript_biotype: "protein_coding".to_string(),
            variation_source: "COSMIC".to_string(),
        }
    }
}

/// Variant frequency table configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Path to a `variant_id<TAB>count` file, gzip-compressed if it ends in `.gz`.
    /// Without a path every variant count is unknown.
    pub path: Option<String>,
}

/// Feature cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache feature documents per gene/transcript.
    pub enabled: bool,

    /// JSON file the cache is loaded from at startup and saved to at shutdown.
    pub persistence_path: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            persistence_path: None,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:2999");
        assert_eq!(config.biomart.gene_dataset, "hsapiens_gene_ensembl");
        assert_eq!(config.biomart.variation_source, "COSMIC");
        assert!(config.cache.enabled);
        assert!(config.frequencies.path.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:4000"

            [frequencies]
            path = "data/frequencies.txt.gz"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.frequencies.path.as_deref(), Some("data/frequencies.txt.gz"));
        assert_eq!(config.upstream.fetch_timeout_secs, 60);
        assert_eq!(config.biomart.variant_dataset, "hsapiens_snp_som");
    }
}
