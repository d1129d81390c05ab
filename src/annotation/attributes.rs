//! Attribute schemas for BioMart queries.
//!
//! Each schema lists the attributes requested from BioMart in the exact order
//! they come back as TSV columns.

/// Scalar kind of a BioMart attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Kept verbatim (empty string allowed).
    Text,
    /// Parsed as an integer; missing or non-numeric is `None`.
    Int,
    /// Parsed as a float; missing or non-numeric is `None`.
    Float,
}

/// A named attribute with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
}

const fn text(name: &'static str) -> Attribute {
    Attribute { name, kind: AttributeKind::Text }
}

const fn int(name: &'static str) -> Attribute {
    Attribute { name, kind: AttributeKind::Int }
}

const fn float(name: &'static str) -> Attribute {
    Attribute { name, kind: AttributeKind::Float }
}

/// Ordered attribute list for one query purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSchema {
    attributes: &'static [Attribute],
}

impl AttributeSchema {
    pub const fn new(attributes: &'static [Attribute]) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &'static [Attribute] {
        self.attributes
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.attributes.iter().map(|a| a.name)
    }

    /// Column index of an attribute, if the schema declares it.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Gene/transcript/InterPro domain annotations (`hsapiens_gene_ensembl`).
pub const DOMAIN_ATTRIBUTES: AttributeSchema = AttributeSchema::new(&[
    text("ensembl_gene_id"),
    text("ensembl_transcript_id"),
    text("ensembl_peptide_id"),
    text("transcript_biotype"),
    text("uniprotswissprot"),
    text("entrezgene"),
    text("refseq_mrna"),
    text("description"),
    text("chromosome_name"),
    int("start_position"),
    int("end_position"),
    text("external_gene_name"),
    text("family"),
    text("family_description"),
    text("interpro"),
    text("interpro_short_description"),
    text("interpro_description"),
    int("interpro_start"),
    int("interpro_end"),
]);

/// Somatic variant annotations (`hsapiens_snp_som`).
pub const VARIANT_ATTRIBUTES: AttributeSchema = AttributeSchema::new(&[
    text("refsnp_id"),
    text("refsnp_source"),
    text("chr_name"),
    int("chrom_start"),
    int("chrom_end"),
    text("ensembl_gene_stable_id"),
    text("ensembl_transcript_stable_id"),
    int("ensembl_transcript_chrom_strand"),
    text("ensembl_type"),
    text("consequence_type_tv"),
    text("consequence_allele_string"),
    int("cdna_start"),
    int("cdna_end"),
    text("ensembl_peptide_allele"),
    int("translation_start"),
    int("translation_end"),
    int("cds_start"),
    int("cds_end"),
    int("distance_to_transcript"),
    text("polyphen_prediction"),
    float("polyphen_score"),
    text("sift_prediction"),
    float("sift_score"),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_schema_order() {
        assert_eq!(DOMAIN_ATTRIBUTES.len(), 19);
        assert_eq!(DOMAIN_ATTRIBUTES.position("ensembl_gene_id"), Some(0));
        assert_eq!(DOMAIN_ATTRIBUTES.position("ensembl_transcript_id"), Some(1));
        assert_eq!(DOMAIN_ATTRIBUTES.position("interpro_end"), Some(18));
        assert_eq!(DOMAIN_ATTRIBUTES.attributes()[17].kind, AttributeKind::Int);
    }

    #[test]
    fn test_variant_schema_order() {
        assert_eq!(VARIANT_ATTRIBUTES.len(), 23);
        let names: Vec<_> = VARIANT_ATTRIBUTES.names().collect();
        assert_eq!(names[0], "refsnp_id");
        assert_eq!(names[14], "translation_start");
        assert_eq!(names[15], "translation_end");
        assert_eq!(names[22], "sift_score");
        assert_eq!(VARIANT_ATTRIBUTES.attributes()[20].kind, AttributeKind::Float);
    }

    #[test]
    fn test_unknown_attribute() {
        assert_eq!(VARIANT_ATTRIBUTES.position("interpro"), None);
    }
}
