//! Request handlers.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::feature::FeatureError;
use crate::http::request::{FeatureQuery, RequestIdExt};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::UpstreamSource;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub frequency_entries: usize,
    pub cached_features: usize,
}

/// `GET /?ensemblGeneId=..[&ensemblTranscriptId=..]`
pub async fn get_feature<S: UpstreamSource>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Query(query): Query<FeatureQuery>,
) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id().to_string();
    let gene_id = query.gene_id.unwrap_or_default();
    let transcript_id = query.transcript_id;

    tracing::info!(
        request_id = %request_id,
        gene_id = %gene_id,
        transcript_id = ?transcript_id,
        "Feature request"
    );

    let service = &state.service;
    let result = match &state.cache {
        Some(cache) if !gene_id.trim().is_empty() => {
            let key = CacheKey::new(&gene_id, transcript_id.as_deref());
            cache
                .get_or_build(key, || service.get_feature(&gene_id, transcript_id.as_deref()))
                .await
        }
        _ => service.get_feature(&gene_id, transcript_id.as_deref()).await,
    };

    match result {
        Ok(document) => {
            metrics::record_request("ok", start);
            tracing::info!(
                request_id = %request_id,
                gene_id = %gene_id,
                domains = document.domains.len(),
                variants = document.variants.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Feature request completed"
            );
            Json(document).into_response()
        }
        Err(e) => {
            metrics::record_request(e.code(), start);
            log_failure(&request_id, &gene_id, &e);
            e.into_response()
        }
    }
}

fn log_failure(request_id: &str, gene_id: &str, err: &FeatureError) {
    match err {
        FeatureError::Upstream(_) | FeatureError::JoinInconsistency { .. } => tracing::error!(
            request_id = %request_id,
            gene_id = %gene_id,
            error = %err,
            "Feature request failed"
        ),
        _ => tracing::info!(
            request_id = %request_id,
            gene_id = %gene_id,
            error = %err,
            "Feature request rejected"
        ),
    }
}

/// `GET /health`
pub async fn get_health<S: UpstreamSource>(
    State(state): State<AppState<S>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        frequency_entries: state.service.frequencies().len(),
        cached_features: state.cache.as_ref().map_or(0, |c| c.len()),
    })
}
