//! Feature assembly errors.

use thiserror::Error;

use crate::upstream::UpstreamError;

/// Fatal conditions of a feature request. Non-fatal data problems
/// (unmatched transcripts, malformed variant rows, unknown counts) are
/// filtered or defaulted and never reach this type.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// No gene id supplied.
    #[error("no ensemblGeneId specified")]
    MissingInput,

    /// An upstream fetch failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The gene has no protein-coding transcript with domain annotations.
    #[error("non-protein coding gene specified: {gene_id}")]
    NoProteinCodingTranscript {
        gene_id: String,
        transcript_id: Option<String>,
    },

    /// The canonical transcript's sequences could not be resolved.
    #[error("inconsistent upstream data for transcript {transcript_id}: {reason}")]
    JoinInconsistency {
        transcript_id: String,
        reason: String,
    },
}

impl FeatureError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            FeatureError::MissingInput => "missing_input",
            FeatureError::Upstream(e) if e.is_timeout() => "upstream_timeout",
            FeatureError::Upstream(_) => "upstream_fetch_failure",
            FeatureError::NoProteinCodingTranscript { .. } => "no_protein_coding_transcript",
            FeatureError::JoinInconsistency { .. } => "join_inconsistency",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            FeatureError::MissingInput => 400,
            FeatureError::Upstream(e) if e.is_timeout() => 504,
            FeatureError::Upstream(_) => 502,
            FeatureError::NoProteinCodingTranscript { .. } => 404,
            FeatureError::JoinInconsistency { .. } => 502,
        }
    }
}

/// Result type for feature assembly.
pub type FeatureResult<T> = Result<T, FeatureError>;
