//! BioMart martservice queries.
//!
//! # Responsibilities
//! - Build the XML query document for an attribute schema and filter set
//! - Embed it as the `query` URL parameter
//! - Fetch the TSV body and surface BioMart's in-band query errors

use reqwest::Client;
use url::Url;

use crate::annotation::AttributeSchema;
use crate::upstream::error::{Upstream, UpstreamError, UpstreamResult};

/// A BioMart query over one dataset.
#[derive(Debug, Clone)]
pub struct BioMartQuery<'a> {
    pub virtual_schema: &'a str,
    pub dataset: &'a str,
    pub unique_rows: bool,
    pub filters: Vec<(&'a str, &'a str)>,
    pub attributes: AttributeSchema,
}

impl BioMartQuery<'_> {
    /// Render the query as a headerless TSV request.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.attributes.len() * 40);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE Query>\n");
        xml.push_str(&format!(
            concat!(
                "<Query virtualSchemaName=\"{}\" formatter=\"TSV\" header=\"0\" ",
                "uniqueRows=\"{}\" count=\"\" datasetConfigVersion=\"0.6\">\n",
            ),
            xml_escape(self.virtual_schema),
            u8::from(self.unique_rows),
        ));
        xml.push_str(&format!(
            "  <Dataset name=\"{}\" interface=\"default\">\n",
            xml_escape(self.dataset)
        ));
        for (name, value) in &self.filters {
            xml.push_str(&format!(
                "    <Filter name=\"{}\" value=\"{}\"/>\n",
                xml_escape(name),
                xml_escape(value)
            ));
        }
        for name in self.attributes.names() {
            xml.push_str(&format!("    <Attribute name=\"{}\"/>\n", name));
        }
        xml.push_str("  </Dataset>\n</Query>\n");
        xml
    }

    /// The martservice URL carrying this query.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair("query", &self.to_xml());
        url
    }
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Run a query and return the raw TSV body.
pub async fn fetch_tsv(
    client: &Client,
    endpoint: &Url,
    query: &BioMartQuery<'_>,
    upstream: Upstream,
) -> UpstreamResult<String> {
    let url = query.to_url(endpoint);
    tracing::debug!(upstream = %upstream, dataset = query.dataset, "Querying BioMart");

    let response = client
        .get(url)
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

    let body = response.text().await.map_err(|e| UpstreamError::Decode {
        upstream,
        message: e.to_string(),
    })?;

    check_query_error(&body, upstream)?;
    Ok(body)
}

/// BioMart answers failed queries with status 200 and a `Query ERROR` body.
pub fn check_query_error(body: &str, upstream: Upstream) -> UpstreamResult<()> {
    let head = body.trim_start();
    if head.starts_with("Query ERROR") {
        let message = head.lines().next().unwrap_or(head).to_string();
        return Err(UpstreamError::Decode { upstream, message });
    }
    Ok(())
}
