//! Upstream identities and fetch errors.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The four upstream datasets a feature document is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    /// BioMart gene/transcript/InterPro annotations.
    Domains,
    /// BioMart somatic variant annotations.
    Variants,
    /// Ensembl REST protein sequences.
    ProteinSequences,
    /// Ensembl REST coding sequences.
    CdsSequences,
}

impl Upstream {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Domains => "biomart_domains",
            Upstream::Variants => "biomart_variants",
            Upstream::ProteinSequences => "ensembl_protein",
            Upstream::CdsSequences => "ensembl_cds",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while fetching from an upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection or transport failure.
    #[error("{upstream}: request failed: {message}")]
    Request { upstream: Upstream, message: String },

    /// Non-2xx response.
    #[error("{upstream}: unexpected status {status}")]
    Status { upstream: Upstream, status: u16 },

    /// Body could not be decoded, or the upstream reported a query error.
    #[error("{upstream}: malformed response: {message}")]
    Decode { upstream: Upstream, message: String },

    /// Fetch exceeded its deadline.
    #[error("{upstream}: timed out after {}ms", .limit.as_millis())]
    Timeout { upstream: Upstream, limit: Duration },

    /// The fetch task panicked or was cancelled.
    #[error("{upstream}: fetch task aborted: {message}")]
    Aborted { upstream: Upstream, message: String },

    /// The client could not be built from configuration.
    #[error("upstream client error: {0}")]
    Client(String),
}

impl UpstreamError {
    /// The upstream this error originated from, if any.
    pub fn upstream(&self) -> Option<Upstream> {
        match self {
            UpstreamError::Request { upstream, .. }
            | UpstreamError::Status { upstream, .. }
            | UpstreamError::Decode { upstream, .. }
            | UpstreamError::Timeout { upstream, .. }
            | UpstreamError::Aborted { upstream, .. } => Some(*upstream),
            UpstreamError::Client(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }
}

/// Result type for upstream fetches.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
