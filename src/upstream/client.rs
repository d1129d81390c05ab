//! HTTP-backed upstream source.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::annotation::{parse_records, DomainRecord, SequenceRecord, VariantRecord};
use crate::annotation::{DOMAIN_ATTRIBUTES, VARIANT_ATTRIBUTES};
use crate::config::{BioMartConfig, UpstreamConfig};
use crate::upstream::biomart::{fetch_tsv, BioMartQuery};
use crate::upstream::ensembl::{fetch_sequences, SequenceType};
use crate::upstream::error::{Upstream, UpstreamError, UpstreamResult};
use crate::upstream::UpstreamSource;

/// Fetches from the Ensembl REST API and a BioMart martservice.
#[derive(Debug, Clone)]
pub struct EnsemblUpstream {
    client: Client,
    rest_url: Url,
    biomart_url: Url,
    biomart: BioMartConfig,
}

impl EnsemblUpstream {
    /// Build the client from configuration.
    pub fn new(upstream: &UpstreamConfig, biomart: &BioMartConfig) -> UpstreamResult<Self> {
        let rest_url = parse_url(&upstream.ensembl_rest_url)?;
        let biomart_url = parse_url(&biomart.url)?;

        let client = Client::builder()
            .user_agent(upstream.user_agent.clone())
            .connect_timeout(Duration::from_secs(upstream.connect_timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            client,
            rest_url,
            biomart_url,
            biomart: biomart.clone(),
        })
    }

    fn domain_query<'a>(&'a self, gene_id: &'a str) -> BioMartQuery<'a> {
        BioMartQuery {
            virtual_schema: &self.biomart.virtual_schema,
            dataset: &self.biomart.gene_dataset,
            unique_rows: false,
            filters: vec![
                ("ensembl_gene_id", gene_id),
                ("transcript_biotype", self.biomart.transcript_biotype.as_str()),
            ],
            attributes: DOMAIN_ATTRIBUTES,
        }
    }

    fn variant_query<'a>(&'a self, gene_id: &'a str) -> BioMartQuery<'a> {
        BioMartQuery {
            virtual_schema: &self.biomart.virtual_schema,
            dataset: &self.biomart.variant_dataset,
            unique_rows: true,
            filters: vec![
                ("variation_source", self.biomart.variation_source.as_str()),
                ("ensembl_gene", gene_id),
            ],
            attributes: VARIANT_ATTRIBUTES,
        }
    }
}

fn parse_url(value: &str) -> UpstreamResult<Url> {
    Url::parse(value).map_err(|e| UpstreamError::Client(format!("invalid URL '{}': {}", value, e)))
}

impl UpstreamSource for EnsemblUpstream {
    async fn fetch_domains(&self, gene_id: &str) -> UpstreamResult<Vec<DomainRecord>> {
        let query = self.domain_query(gene_id);
        let body = fetch_tsv(&self.client, &self.biomart_url, &query, Upstream::Domains).await?;
        Ok(parse_records(&body))
    }

    async fn fetch_variants(&self, gene_id: &str) -> UpstreamResult<Vec<VariantRecord>> {
        let query = self.variant_query(gene_id);
        let body = fetch_tsv(&self.client, &self.biomart_url, &query, Upstream::Variants).await?;
        Ok(parse_records(&body))
    }

    async fn fetch_protein_sequences(&self, gene_id: &str) -> UpstreamResult<Vec<SequenceRecord>> {
        fetch_sequences(&self.client, &self.rest_url, gene_id, SequenceType::Protein).await
    }

    async fn fetch_cds_sequences(&self, gene_id: &str) -> UpstreamResult<Vec<SequenceRecord>> {
        fetch_sequences(&self.client, &self.rest_url, gene_id, SequenceType::Cds).await
    }
}
