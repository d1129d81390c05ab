//! Upstream data sources.
//!
//! # Data Flow
//! ```text
//! gene id
//!     → biomart.rs (XML query → TSV)      → DomainRecord / VariantRecord
//!     → ensembl.rs (REST /sequence/id)    → SequenceRecord (protein, cds)
//! ```
//!
//! # Design Decisions
//! - One trait with four independent fetches; the feature service runs them
//!   concurrently and never orders them
//! - Every error carries the `Upstream` it came from
//! - No retries: a failed fetch fails the request

use std::future::Future;

use crate::annotation::{DomainRecord, SequenceRecord, VariantRecord};

pub mod biomart;
pub mod client;
pub mod ensembl;
pub mod error;

pub use client::EnsemblUpstream;
pub use error::{Upstream, UpstreamError, UpstreamResult};

/// The four per-gene fetches a feature document is built from.
pub trait UpstreamSource: Send + Sync + 'static {
    /// InterPro domain rows for every protein-coding transcript of the gene.
    fn fetch_domains(
        &self,
        gene_id: &str,
    ) -> impl Future<Output = UpstreamResult<Vec<DomainRecord>>> + Send;

    /// Somatic variant rows for the gene, across all transcripts.
    fn fetch_variants(
        &self,
        gene_id: &str,
    ) -> impl Future<Output = UpstreamResult<Vec<VariantRecord>>> + Send;

    /// Protein sequences keyed by peptide id.
    fn fetch_protein_sequences(
        &self,
        gene_id: &str,
    ) -> impl Future<Output = UpstreamResult<Vec<SequenceRecord>>> + Send;

    /// Coding sequences keyed by transcript id.
    fn fetch_cds_sequences(
        &self,
        gene_id: &str,
    ) -> impl Future<Output = UpstreamResult<Vec<SequenceRecord>>> + Send;
}
