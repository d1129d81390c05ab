//! Variant observation counts.
//!
//! # Responsibilities
//! - Load `variant_id<TAB>count` tables (plain or gzip) once at startup
//! - Answer read-only lookups shared across concurrent requests
//! - Attach counts to variant records
//!
//! # Design Decisions
//! - Immutable after load; shared behind `Arc`, no locking
//! - A missing entry means "unknown", never zero

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::VariantRecord;
use crate::observability::metrics;

/// Errors raised while loading a frequency table.
#[derive(Debug, Error)]
pub enum FrequencyError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read line {line}: {source}")]
    Read { line: usize, source: std::io::Error },
}

/// Read-only map from reference SNP id to observation count.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// An empty table: every count is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a path (supports plain text and `.gz`).
    pub fn load(path: &Path) -> Result<Self, FrequencyError> {
        let file = File::open(path).map_err(|source| FrequencyError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let table = if path.extension().is_some_and(|ext| ext == "gz") {
            Self::from_reader(flate2::read::GzDecoder::new(file))?
        } else {
            Self::from_reader(file)?
        };

        tracing::info!(path = %path.display(), entries = table.len(), "Loaded variant frequencies");
        metrics::record_frequency_entries(table.len());
        Ok(table)
    }

    /// Parse `variant_id<TAB>count` lines.
    ///
    /// Blank lines are skipped; lines without an integer count are skipped
    /// with a warning. A repeated id keeps its last count.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FrequencyError> {
        let mut counts = HashMap::new();
        let mut skipped = 0usize;

        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|source| FrequencyError::Read {
                line: index + 1,
                source,
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let id = fields.next().unwrap_or_default().trim();
            match fields.next().map(|c| c.trim().parse::<u64>()) {
                Some(Ok(count)) if !id.is_empty() => {
                    counts.insert(id.to_string(), count);
                }
                _ => {
                    skipped += 1;
                    tracing::debug!(line = index + 1, "Skipping malformed frequency line");
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped malformed frequency lines");
        }
        Ok(Self { counts })
    }

    pub fn get(&self, variant_id: &str) -> Option<u64> {
        self.counts.get(variant_id).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Set each variant's count from the table; unknown ids get `None`.
    /// Returns how many variants had no entry.
    pub fn enrich(&self, variants: &mut [VariantRecord]) -> usize {
        let mut missing = 0;
        for variant in variants.iter_mut() {
            variant.count = self.get(&variant.refsnp_id);
            if variant.count.is_none() {
                missing += 1;
            }
        }
        missing
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
