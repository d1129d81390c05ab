//! Response mapping.
//!
//! # Responsibilities
//! - Map feature errors to HTTP status codes and a JSON error body
//!
//! # Design Decisions
//! - Upstream timeouts result in 504 Gateway Timeout
//! - Other upstream failures and inconsistent upstream data are 502

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::feature::FeatureError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&FeatureError> for ErrorResponse {
    fn from(err: &FeatureError) -> Self {
        Self {
            error: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for FeatureError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{Upstream, UpstreamError};

    #[test]
    fn test_missing_input_response() {
        let response = FeatureError::MissingInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_timeout_response() {
        let err = FeatureError::Upstream(UpstreamError::Timeout {
            upstream: Upstream::CdsSequences,
            limit: std::time::Duration::from_secs(60),
        });
        let body = ErrorResponse::from(&err);
        assert_eq!(body.error, "upstream_timeout");
        assert!(body.message.contains("ensembl_cds"));
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_no_transcript_response() {
        let err = FeatureError::NoProteinCodingTranscript {
            gene_id: "G1".into(),
            transcript_id: None,
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
