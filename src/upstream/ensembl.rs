//! Ensembl REST sequence endpoint.

use reqwest::Client;
use url::Url;

use crate::annotation::SequenceRecord;
use crate::upstream::error::{Upstream, UpstreamError, UpstreamResult};

/// Sequence type requested from `/sequence/id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceType {
    Protein,
    Cds,
}

impl SequenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceType::Protein => "protein",
            SequenceType::Cds => "cds",
        }
    }

    pub fn upstream(&self) -> Upstream {
        match self {
            SequenceType::Protein => Upstream::ProteinSequences,
            SequenceType::Cds => Upstream::CdsSequences,
        }
    }
}

/// `/sequence/id/{gene}` URL returning every transcript's sequence of `kind`.
pub fn sequence_url(base: &Url, gene_id: &str, kind: SequenceType) -> UpstreamResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UpstreamError::Client(format!("'{}' cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(["sequence", "id", gene_id]);
    url.query_pairs_mut()
        .append_pair("content-type", "application/json")
        .append_pair("type", kind.as_str())
        .append_pair("multiple_sequences", "1");
    Ok(url)
}

/// Fetch all sequences of `kind` for a gene.
pub async fn fetch_sequences(
    client: &Client,
    base: &Url,
    gene_id: &str,
    kind: SequenceType,
) -> UpstreamResult<Vec<SequenceRecord>> {
    let upstream = kind.upstream();
    let url = sequence_url(base, gene_id, kind)?;
    tracing::debug!(upstream = %upstream, gene_id = %gene_id, "Fetching sequences");

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| UpstreamError::Request {
            upstream,
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            upstream,
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|e| UpstreamError::Request {
        upstream,
        message: e.to_string(),
    })?;
    decode_sequences(&body, upstream)
}

/// Decode a JSON array of `{id, seq}` objects; extra fields are ignored.
pub fn decode_sequences(body: &[u8], upstream: Upstream) -> UpstreamResult<Vec<SequenceRecord>> {
    serde_json::from_slice(body).map_err(|e| UpstreamError::Decode {
        upstream,
        message: e.to_string(),
    })
}
