//! Feature document shape and builder.
//!
//! Domains keep the inclusive end given by InterPro; variant ends are
//! shifted by one to a half-open end, as genome-browser tracks expect.

use serde::{Deserialize, Serialize};

use crate::annotation::{DomainRecord, VariantRecord};
use crate::feature::error::{FeatureError, FeatureResult};
use crate::feature::join::CanonicalTranscript;

/// Codon length dropped from the end of the CDS (the stop codon).
const STOP_CODON_LEN: usize = 3;

/// The response document for one gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDocument {
    pub protein: Protein,
    pub domains: Vec<DomainFeature>,
    pub variants: Vec<VariantFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protein {
    pub name: String,
    pub sequences: ProteinSequences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinSequences {
    #[serde(rename = "aminoAcid")]
    pub amino_acid: String,
    #[serde(rename = "translatedDna")]
    pub translated_dna: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFeature {
    #[serde(rename = "uniqueId")]
    pub unique_id: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub seq_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantFeature {
    #[serde(rename = "uniqueId")]
    pub unique_id: String,
    pub start: i64,
    /// Exclusive end.
    pub end: i64,
    pub transcript: String,
    pub seq_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
}

impl DomainFeature {
    fn from_record(record: &DomainRecord, seq_id: &str) -> Self {
        Self {
            unique_id: format!(
                "{}_{}_{}",
                record.interpro,
                coord(record.interpro_start),
                coord(record.interpro_end)
            ),
            start: record.interpro_start,
            end: record.interpro_end,
            seq_id: seq_id.to_string(),
            kind: record.interpro_short_description.clone(),
        }
    }
}

impl VariantFeature {
    /// `None` for rows without an ordered translation span.
    fn from_record(record: &VariantRecord, seq_id: &str) -> Option<Self> {
        let (start, end) = record.translation_span()?;
        Some(Self {
            unique_id: record.refsnp_id.clone(),
            start,
            end: end.checked_add(1)?,
            transcript: record.ensembl_transcript_stable_id.clone(),
            seq_id: seq_id.to_string(),
            score: record.count,
        })
    }
}

fn coord(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Drop the trailing stop codon from a coding sequence.
pub fn strip_stop_codon(cds: &str) -> Option<&str> {
    let cut = cds.char_indices().rev().nth(STOP_CODON_LEN - 1)?.0;
    Some(&cds[..cut])
}

/// Map the canonical transcript to the response document.
pub fn build_document(transcript: &CanonicalTranscript) -> FeatureResult<FeatureDocument> {
    let translated_dna = strip_stop_codon(&transcript.cds_sequence).ok_or_else(|| {
        FeatureError::JoinInconsistency {
            transcript_id: transcript.transcript_id.clone(),
            reason: format!(
                "coding sequence has {} bases, expected at least {}",
                transcript.cds_sequence.chars().count(),
                STOP_CODON_LEN
            ),
        }
    })?;

    let name = &transcript.name;
    let domains = transcript
        .domains
        .iter()
        .map(|d| DomainFeature::from_record(d, name))
        .collect();
    let variants = transcript
        .variants
        .iter()
        .filter_map(|v| VariantFeature::from_record(v, name))
        .collect();

    Ok(FeatureDocument {
        protein: Protein {
            name: name.clone(),
            sequences: ProteinSequences {
                amino_acid: transcript.protein_sequence.clone(),
                translated_dna: translated_dna.to_string(),
            },
        },
        domains,
        variants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript() -> CanonicalTranscript {
        CanonicalTranscript {
            transcript_id: "T1".into(),
            name: "GENE1".into(),
            peptide_id: "P1".into(),
            domains: vec![DomainRecord {
                ensembl_transcript_id: "T1".into(),
                interpro: "IPR1".into(),
                interpro_short_description: "Kinase".into(),
                interpro_start: Some(10),
                interpro_end: Some(50),
                ..Default::default()
            }],
            variants: vec![VariantRecord {
                refsnp_id: "rs1".into(),
                ensembl_transcript_stable_id: "T1".into(),
                translation_start: Some(5),
                translation_end: Some(5),
                count: Some(3),
                ..Default::default()
            }],
            protein_sequence: "MKV".into(),
            cds_sequence: "ATGAAAGTTTAA".into(),
        }
    }

    #[test]
    fn test_document_shape() {
        let doc = build_document(&transcript()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "protein": {
                    "name": "GENE1",
                    "sequences": { "aminoAcid": "MKV", "translatedDna": "ATGAAAGTT" }
                },
                "domains": [
                    {
                        "uniqueId": "IPR1_10_50",
                        "start": 10,
                        "end": 50,
                        "seq_id": "GENE1",
                        "type": "Kinase"
                    }
                ],
                "variants": [
                    {
                        "uniqueId": "rs1",
                        "start": 5,
                        "end": 6,
                        "transcript": "T1",
                        "seq_id": "GENE1",
                        "score": 3
                    }
                ]
            })
        );
    }

    #[test]
    fn test_unknown_score_omitted() {
        let mut t = transcript();
        t.variants[0].count = None;
        let doc = build_document(&t).unwrap();
        let value = serde_json::to_value(&doc.variants[0]).unwrap();
        assert!(value.get("score").is_none());
    }

    #[test]
    fn test_variant_end_is_exclusive() {
        let mut t = transcript();
        t.variants[0].translation_start = Some(7);
        t.variants[0].translation_end = Some(12);
        let doc = build_document(&t).unwrap();
        assert_eq!(doc.variants[0].start, 7);
        assert_eq!(doc.variants[0].end, 13);
    }

    #[test]
    fn test_malformed_variant_not_emitted() {
        let mut t = transcript();
        t.variants[0].translation_start = Some(9);
        t.variants[0].translation_end = Some(8);
        let doc = build_document(&t).unwrap();
        assert!(doc.variants.is_empty());
    }

    #[test]
    fn test_end_at_integer_limit_not_emitted() {
        let mut t = transcript();
        t.variants[0].translation_start = Some(i64::MAX);
        t.variants[0].translation_end = Some(i64::MAX);
        let doc = build_document(&t).unwrap();
        assert!(doc.variants.is_empty());
    }

    #[test]
    fn test_missing_domain_coordinates() {
        let mut t = transcript();
        t.domains[0].interpro_start = None;
        t.domains[0].interpro_end = None;
        let doc = build_document(&t).unwrap();
        assert_eq!(doc.domains[0].unique_id, "IPR1__");
        let value = serde_json::to_value(&doc.domains[0]).unwrap();
        assert!(value["start"].is_null());
    }

    #[test]
    fn test_strip_stop_codon() {
        assert_eq!(strip_stop_codon("ATGTAA"), Some("ATG"));
        assert_eq!(strip_stop_codon("TAA"), Some(""));
        assert_eq!(strip_stop_codon("TA"), None);
        assert_eq!(strip_stop_codon(""), None);
    }

    #[test]
    fn test_translated_dna_length() {
        for cds in ["TAA", "ATGTAA", "ATGAAAGTTTAA"] {
            let mut t = transcript();
            t.cds_sequence = cds.into();
            let doc = build_document(&t).unwrap();
            assert_eq!(doc.protein.sequences.translated_dna.len(), cds.len() - 3);
        }
    }

    #[test]
    fn test_short_cds_is_inconsistent() {
        let mut t = transcript();
        t.cds_sequence = "AT".into();
        let err = build_document(&t).unwrap_err();
        assert!(matches!(err, FeatureError::JoinInconsistency { .. }));
    }
}
