//! Transcript join engine.
//!
//! # Responsibilities
//! - Index domain rows by transcript, in first-seen order
//! - Attach variant rows and protein/CDS sequences to each transcript
//! - Select the canonical transcript and resolve its sequences
//!
//! # Design Decisions
//! - The domain rows define the transcript universe; variants and sequences
//!   for any other transcript are skipped (logged, never an error)
//! - Canonical = first transcript seen in upstream domain order. This is a
//!   positional tie-break, not a biological ranking
//! - Sequence lookups are keyed maps; a repeated id keeps its last sequence

use std::collections::HashMap;

use crate::annotation::{DomainRecord, SequenceRecord, VariantRecord};
use crate::feature::error::{FeatureError, FeatureResult};

/// Everything known about one transcript of the gene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranscriptGroup {
    pub transcript_id: String,
    /// Gene symbol (`external_gene_name`).
    pub name: String,
    pub peptide_id: String,
    pub domains: Vec<DomainRecord>,
    pub variants: Vec<VariantRecord>,
    pub protein_sequence: Option<String>,
    pub cds_sequence: Option<String>,
}

/// Transcript groups keyed by transcript id, remembering first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TranscriptIndex {
    order: Vec<String>,
    groups: HashMap<String, TranscriptGroup>,
}

impl TranscriptIndex {
    /// Group rows by transcript and attach sequences.
    pub fn build(
        domains: Vec<DomainRecord>,
        variants: Vec<VariantRecord>,
        proteins: Vec<SequenceRecord>,
        cds: Vec<SequenceRecord>,
    ) -> Self {
        let mut index = Self::default();

        for domain in domains {
            let id = domain.ensembl_transcript_id.clone();
            let group = index.groups.entry(id.clone()).or_insert_with(|| {
                index.order.push(id.clone());
                TranscriptGroup {
                    transcript_id: id,
                    ..Default::default()
                }
            });
            // Rows of one transcript share these; last write wins.
            group.name.clone_from(&domain.external_gene_name);
            group.peptide_id.clone_from(&domain.ensembl_peptide_id);
            group.domains.push(domain);
        }

        let mut unmatched_variants = 0usize;
        for variant in variants {
            match index.groups.get_mut(&variant.ensembl_transcript_stable_id) {
                Some(group) => group.variants.push(variant),
                None => unmatched_variants += 1,
            }
        }

        let proteins: HashMap<String, String> =
            proteins.into_iter().map(|s| (s.id, s.seq)).collect();
        let mut cds: HashMap<String, String> = cds.into_iter().map(|s| (s.id, s.seq)).collect();

        for group in index.groups.values_mut() {
            group.protein_sequence = proteins.get(&group.peptide_id).cloned();
            group.cds_sequence = cds.remove(&group.transcript_id);
        }

        if unmatched_variants > 0 || !cds.is_empty() {
            tracing::debug!(
                unmatched_variants,
                unmatched_cds = cds.len(),
                "Skipped rows for transcripts without domain annotations"
            );
        }

        index
    }

    /// Transcript ids in first-seen domain order.
    pub fn transcripts(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, transcript_id: &str) -> Option<&TranscriptGroup> {
        self.groups.get(transcript_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Id of the canonical transcript: the first one seen.
    pub fn canonical_id(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Take the canonical transcript's group out of the index.
    pub fn into_canonical(mut self) -> Option<TranscriptGroup> {
        let id = self.order.first()?;
        self.groups.remove(id)
    }
}

/// The canonical transcript with both sequences resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTranscript {
    pub transcript_id: String,
    pub name: String,
    pub peptide_id: String,
    pub domains: Vec<DomainRecord>,
    pub variants: Vec<VariantRecord>,
    pub protein_sequence: String,
    pub cds_sequence: String,
}

impl TryFrom<TranscriptGroup> for CanonicalTranscript {
    type Error = FeatureError;

    fn try_from(mut group: TranscriptGroup) -> FeatureResult<Self> {
        let protein_sequence = group.protein_sequence.take().ok_or_else(|| {
            FeatureError::JoinInconsistency {
                transcript_id: group.transcript_id.clone(),
                reason: format!("no protein sequence for peptide '{}'", group.peptide_id),
            }
        })?;
        let cds_sequence = group.cds_sequence.take().ok_or_else(|| FeatureError::JoinInconsistency {
            transcript_id: group.transcript_id.clone(),
            reason: "no coding sequence".to_string(),
        })?;

        let id = group.transcript_id;
        group.domains.retain(|d| d.ensembl_transcript_id == id);
        group.variants.retain(|v| v.ensembl_transcript_stable_id == id);

        Ok(Self {
            transcript_id: id,
            name: group.name,
            peptide_id: group.peptide_id,
            domains: group.domains,
            variants: group.variants,
            protein_sequence,
            cds_sequence,
        })
    }
}

/// Join the four upstream datasets of a gene into its canonical transcript.
pub fn join_canonical(
    gene_id: &str,
    domains: Vec<DomainRecord>,
    variants: Vec<VariantRecord>,
    proteins: Vec<SequenceRecord>,
    cds: Vec<SequenceRecord>,
) -> FeatureResult<CanonicalTranscript> {
    let index = TranscriptIndex::build(domains, variants, proteins, cds);
    tracing::debug!(
        gene_id = %gene_id,
        transcripts = index.len(),
        canonical = ?index.canonical_id(),
        "Joined transcripts"
    );

    let group = index
        .into_canonical()
        .ok_or_else(|| FeatureError::NoProteinCodingTranscript {
            gene_id: gene_id.to_string(),
            transcript_id: None,
        })?;
    CanonicalTranscript::try_from(group)
}
