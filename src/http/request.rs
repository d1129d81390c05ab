//! Request identification and query extraction.
//!
//! # Responsibilities
//! - Generate a UUID v4 request id when the caller sent none
//! - Read the request id back for logging
//! - Describe the feature query parameters
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Missing query parameters are not an extractor rejection; the feature
//!   service reports them as `MissingInput`

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Makes UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request id header.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> &str {
        self.get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Query string of `GET /`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureQuery {
    #[serde(rename = "ensemblGeneId", default)]
    pub gene_id: Option<String>,
    #[serde(rename = "ensemblTranscriptId", default)]
    pub transcript_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_request_id_is_uuid() {
        let request = Request::new(());
        let id = UuidRequestId.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_request_id_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(headers.request_id(), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(headers.request_id(), "abc");
    }

    #[test]
    fn test_query_names() {
        let q: FeatureQuery =
            serde_json::from_str(r#"{"ensemblGeneId":"G1","ensemblTranscriptId":"T1"}"#).unwrap();
        assert_eq!(q.gene_id.as_deref(), Some("G1"));
        assert_eq!(q.transcript_id.as_deref(), Some("T1"));

        let q: FeatureQuery = serde_json::from_str("{}").unwrap();
        assert!(q.gene_id.is_none());
    }
}
