//! Typed annotation records.

use serde::{Deserialize, Serialize};

use crate::annotation::attributes::{AttributeSchema, DOMAIN_ATTRIBUTES, VARIANT_ATTRIBUTES};
use crate::annotation::tabular::{Row, TabularRecord};

/// One InterPro domain hit on a protein-coding transcript.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainRecord {
    pub ensembl_gene_id: String,
    pub ensembl_transcript_id: String,
    pub ensembl_peptide_id: String,
    pub transcript_biotype: String,
    pub uniprotswissprot: String,
    pub entrezgene: String,
    pub refseq_mrna: String,
    pub description: String,
    pub chromosome_name: String,
    pub start_position: Option<i64>,
    pub end_position: Option<i64>,
    pub external_gene_name: String,
    pub family: String,
    pub family_description: String,
    pub interpro: String,
    pub interpro_short_description: String,
    pub interpro_description: String,
    /// 1-based inclusive protein coordinate.
    pub interpro_start: Option<i64>,
    /// 1-based inclusive protein coordinate.
    pub interpro_end: Option<i64>,
}

impl TabularRecord for DomainRecord {
    const SCHEMA: AttributeSchema = DOMAIN_ATTRIBUTES;

    fn from_row(row: &Row) -> Self {
        Self {
            ensembl_gene_id: row.text("ensembl_gene_id"),
            ensembl_transcript_id: row.text("ensembl_transcript_id"),
            ensembl_peptide_id: row.text("ensembl_peptide_id"),
            transcript_biotype: row.text("transcript_biotype"),
            uniprotswissprot: row.text("uniprotswissprot"),
            entrezgene: row.text("entrezgene"),
            refseq_mrna: row.text("refseq_mrna"),
            description: row.text("description"),
            chromosome_name: row.text("chromosome_name"),
            start_position: row.int("start_position"),
            end_position: row.int("end_position"),
            external_gene_name: row.text("external_gene_name"),
            family: row.text("family"),
            family_description: row.text("family_description"),
            interpro: row.text("interpro"),
            interpro_short_description: row.text("interpro_short_description"),
            interpro_description: row.text("interpro_description"),
            interpro_start: row.int("interpro_start"),
            interpro_end: row.int("interpro_end"),
        }
    }
}

/// One somatic variant consequence on a transcript.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariantRecord {
    pub refsnp_id: String,
    pub refsnp_source: String,
    pub chr_name: String,
    pub chrom_start: Option<i64>,
    pub chrom_end: Option<i64>,
    pub ensembl_gene_stable_id: String,
    pub ensembl_transcript_stable_id: String,
    pub ensembl_transcript_chrom_strand: Option<i64>,
    pub ensembl_type: String,
    pub consequence_type_tv: String,
    pub consequence_allele_string: String,
    pub cdna_start: Option<i64>,
    pub cdna_end: Option<i64>,
    pub ensembl_peptide_allele: String,
    pub translation_start: Option<i64>,
    pub translation_end: Option<i64>,
    pub cds_start: Option<i64>,
    pub cds_end: Option<i64>,
    pub distance_to_transcript: Option<i64>,
    pub polyphen_prediction: String,
    pub polyphen_score: Option<f64>,
    pub sift_prediction: String,
    pub sift_score: Option<f64>,
    /// Observation count from the frequency table; `None` when unknown.
    pub count: Option<u64>,
}

impl VariantRecord {
    /// The affected protein span, if it is present and ordered.
    ///
    /// The end stays inclusive; it must leave room for a half-open end.
    pub fn translation_span(&self) -> Option<(i64, i64)> {
        match (self.translation_start, self.translation_end) {
            (Some(start), Some(end)) if start <= end && end.checked_add(1).is_some() => {
                Some((start, end))
            }
            _ => None,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.translation_span().is_some()
    }
}

impl TabularRecord for VariantRecord {
    const SCHEMA: AttributeSchema = VARIANT_ATTRIBUTES;

    fn from_row(row: &Row) -> Self {
        Self {
            refsnp_id: row.text("refsnp_id"),
            refsnp_source: row.text("refsnp_source"),
            chr_name: row.text("chr_name"),
            chrom_start: row.int("chrom_start"),
            chrom_end: row.int("chrom_end"),
            ensembl_gene_stable_id: row.text("ensembl_gene_stable_id"),
            ensembl_transcript_stable_id: row.text("ensembl_transcript_stable_id"),
            ensembl_transcript_chrom_strand: row.int("ensembl_transcript_chrom_strand"),
            ensembl_type: row.text("ensembl_type"),
            consequence_type_tv: row.text("consequence_type_tv"),
            consequence_allele_string: row.text("consequence_allele_string"),
            cdna_start: row.int("cdna_start"),
            cdna_end: row.int("cdna_end"),
            ensembl_peptide_allele: row.text("ensembl_peptide_allele"),
            translation_start: row.int("translation_start"),
            translation_end: row.int("translation_end"),
            cds_start: row.int("cds_start"),
            cds_end: row.int("cds_end"),
            distance_to_transcript: row.int("distance_to_transcript"),
            polyphen_prediction: row.text("polyphen_prediction"),
            polyphen_score: row.float("polyphen_score"),
            sift_prediction: row.text("sift_prediction"),
            sift_score: row.float("sift_score"),
            count: None,
        }
    }
}

/// A sequence keyed by peptide id (protein) or transcript id (CDS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub id: String,
    pub seq: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tabular::parse_records;

    #[test]
    fn test_domain_from_tsv() {
        let line = concat!(
            "G1\tT1\tP1\tprotein_coding\tQ1\t42\tNM_1\tdesc\t7\t100\t900\tGENE1\t",
            "PF1\tfam\tIPR1\tKinase\tKinase domain\t10\t50\n",
        );
        let domains: Vec<DomainRecord> = parse_records(line);
        assert_eq!(domains.len(), 1);
        let d = &domains[0];
        assert_eq!(d.ensembl_transcript_id, "T1");
        assert_eq!(d.ensembl_peptide_id, "P1");
        assert_eq!(d.external_gene_name, "GENE1");
        assert_eq!(d.interpro, "IPR1");
        assert_eq!(d.interpro_short_description, "Kinase");
        assert_eq!(d.start_position, Some(100));
        assert_eq!(d.interpro_start, Some(10));
        assert_eq!(d.interpro_end, Some(50));
    }

    #[test]
    fn test_variant_from_tsv() {
        let line = concat!(
            "rs1\tCOSMIC\t7\t1000\t1000\tG1\tT1\t-1\tsomatic_snv\tmissense_variant\t",
            "A/G\t20\t20\tK/E\t5\t5\t13\t13\t\tdamaging\t0.95\tdeleterious\t0.01",
        );
        let variants: Vec<VariantRecord> = parse_records(line);
        let v = &variants[0];
        assert_eq!(v.refsnp_id, "rs1");
        assert_eq!(v.ensembl_transcript_stable_id, "T1");
        assert_eq!(v.ensembl_transcript_chrom_strand, Some(-1));
        assert_eq!(v.translation_span(), Some((5, 5)));
        assert_eq!(v.distance_to_transcript, None);
        assert_eq!(v.polyphen_score, Some(0.95));
        assert_eq!(v.sift_score, Some(0.01));
        assert_eq!(v.count, None);
    }

    #[test]
    fn test_variant_well_formed() {
        let mut v = VariantRecord {
            translation_start: Some(10),
            translation_end: Some(9),
            ..Default::default()
        };
        assert!(!v.is_well_formed());

        v.translation_end = Some(10);
        assert!(v.is_well_formed());

        v.translation_start = None;
        assert!(!v.is_well_formed());
    }

    #[test]
    fn test_span_at_integer_limit_is_malformed() {
        let line = concat!(
            "rs1\tCOSMIC\t7\t1000\t1000\tG1\tT1\t1\tsomatic_snv\tmissense_variant\t",
            "A/G\t20\t20\tK/E\t9223372036854775807\t9223372036854775807\t",
            "13\t13\t\tbenign\t0.1\ttolerated\t0.9",
        );
        let variants: Vec<VariantRecord> = parse_records(line);
        assert_eq!(variants[0].translation_end, Some(i64::MAX));
        assert_eq!(variants[0].translation_span(), None);
        assert!(!variants[0].is_well_formed());
    }
}
