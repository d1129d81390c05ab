//! Feature request orchestration.
//!
//! # Responsibilities
//! - Validate the request
//! - Run the four upstream fetches concurrently
//! - Check for domain rows before waiting on the other three
//! - Enrich variants, drop malformed rows, apply the transcript filter
//! - Join and build the feature document

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::annotation::VariantRecord;
use crate::feature::document::{build_document, FeatureDocument};
use crate::feature::error::{FeatureError, FeatureResult};
use crate::feature::join::join_canonical;
use crate::frequency::FrequencyTable;
use crate::observability::metrics;
use crate::resilience::timeouts::bounded;
use crate::upstream::{Upstream, UpstreamError, UpstreamResult, UpstreamSource};

/// Builds feature documents from an upstream source and a frequency table.
pub struct FeatureService<S> {
    source: Arc<S>,
    frequencies: Arc<FrequencyTable>,
    fetch_timeout: Duration,
}

impl<S: UpstreamSource> FeatureService<S> {
    pub fn new(source: S, frequencies: Arc<FrequencyTable>, fetch_timeout: Duration) -> Self {
        Self {
            source: Arc::new(source),
            frequencies,
            fetch_timeout,
        }
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Assemble the feature document of a gene's canonical transcript.
    ///
    /// With `transcript_id`, only that transcript's rows are considered, so it
    /// becomes the canonical one.
    pub async fn get_feature(
        &self,
        gene_id: &str,
        transcript_id: Option<&str>,
    ) -> FeatureResult<FeatureDocument> {
        let gene_id = gene_id.trim();
        if gene_id.is_empty() {
            return Err(FeatureError::MissingInput);
        }
        let transcript_id = transcript_id.map(str::trim).filter(|t| !t.is_empty());

        let domains = self.spawn_fetch(Upstream::Domains, gene_id, |source, gene| async move {
            source.fetch_domains(&gene).await
        });
        let variants = self.spawn_fetch(Upstream::Variants, gene_id, |source, gene| async move {
            source.fetch_variants(&gene).await
        });
        let proteins =
            self.spawn_fetch(Upstream::ProteinSequences, gene_id, |source, gene| async move {
                source.fetch_protein_sequences(&gene).await
            });
        let cds = self.spawn_fetch(Upstream::CdsSequences, gene_id, |source, gene| async move {
            source.fetch_cds_sequences(&gene).await
        });

        // Without domain rows there is no coding transcript, whatever the
        // sequence endpoints answered.
        let mut domains = join_fetch(Upstream::Domains, domains).await?;
        if let Some(transcript_id) = transcript_id {
            domains.retain(|d| d.ensembl_transcript_id == transcript_id);
        }
        if domains.is_empty() {
            return Err(FeatureError::NoProteinCodingTranscript {
                gene_id: gene_id.to_string(),
                transcript_id: transcript_id.map(str::to_string),
            });
        }

        // First failure wins; the remaining tasks detach and finish on their own.
        let (mut variants, proteins, cds) = tokio::try_join!(
            join_fetch(Upstream::Variants, variants),
            join_fetch(Upstream::ProteinSequences, proteins),
            join_fetch(Upstream::CdsSequences, cds),
        )?;

        let unknown_counts = self.frequencies.enrich(&mut variants);
        let fetched_variants = variants.len();
        variants.retain(VariantRecord::is_well_formed);
        tracing::debug!(
            gene_id = %gene_id,
            domains = domains.len(),
            variants = fetched_variants,
            malformed_variants = fetched_variants - variants.len(),
            unknown_counts,
            "Fetched upstream rows"
        );

        if let Some(transcript_id) = transcript_id {
            variants.retain(|v| v.ensembl_transcript_stable_id == transcript_id);
        }

        let canonical = join_canonical(gene_id, domains, variants, proteins, cds)?;
        tracing::debug!(
            gene_id = %gene_id,
            transcript_id = %canonical.transcript_id,
            "Selected canonical transcript"
        );
        build_document(&canonical)
    }

    fn spawn_fetch<T, F, Fut>(
        &self,
        upstream: Upstream,
        gene_id: &str,
        fetch: F,
    ) -> JoinHandle<UpstreamResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(Arc<S>, String) -> Fut,
        Fut: Future<Output = UpstreamResult<T>> + Send + 'static,
    {
        let fetch = fetch(Arc::clone(&self.source), gene_id.to_string());
        let limit = self.fetch_timeout;
        tokio::spawn(async move {
            let start = Instant::now();
            let result = bounded(upstream, limit, fetch).await;
            metrics::record_fetch(upstream, start, result.is_ok());
            if let Err(e) = &result {
                tracing::warn!(upstream = %upstream, error = %e, "Upstream fetch failed");
            }
            result
        })
    }
}

async fn join_fetch<T>(
    upstream: Upstream,
    handle: JoinHandle<UpstreamResult<T>>,
) -> UpstreamResult<T> {
    handle.await.map_err(|e| UpstreamError::Aborted {
        upstream,
        message: e.to_string(),
    })?
}
