//! Feature document caching and persistence.
//!
//! Documents are keyed by gene id plus optional transcript filter. Each key
//! holds a once-cell, so concurrent requests for the same gene share one
//! upstream round-trip. Failures leave the cell empty and are never cached.

use std::fs::File;
use std::future::Future;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::feature::{FeatureDocument, FeatureResult};
use crate::observability::metrics;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub gene_id: String,
    pub transcript_id: Option<String>,
}

impl CacheKey {
    pub fn new(gene_id: &str, transcript_id: Option<&str>) -> Self {
        Self {
            gene_id: gene_id.trim().to_string(),
            transcript_id: transcript_id
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }
}

/// On-disk form of one cached document.
#[derive(Serialize, Deserialize)]
struct CacheEntry {
    gene_id: String,
    #[serde(default)]
    transcript_id: Option<String>,
    document: FeatureDocument,
}

/// A thread-safe cache of assembled feature documents.
#[derive(Clone, Default)]
pub struct FeatureCache {
    inner: Arc<DashMap<CacheKey, Arc<OnceCell<FeatureDocument>>>>,
    persistence_path: Option<String>,
}

impl FeatureCache {
    /// Create a new empty cache.
    pub fn new(persistence_path: Option<String>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists; otherwise start empty.
    pub fn load_from_file(path: &str) -> std::io::Result<Self> {
        let cache = Self::new(Some(path.to_string()));
        if Path::new(path).exists() {
            let reader = BufReader::new(File::open(path)?);
            let entries: Vec<CacheEntry> = serde_json::from_reader(reader)?;
            for entry in entries {
                let key = CacheKey {
                    gene_id: entry.gene_id,
                    transcript_id: entry.transcript_id,
                };
                cache
                    .inner
                    .insert(key, Arc::new(OnceCell::new_with(Some(entry.document))));
            }
            tracing::info!(path = %path, entries = cache.len(), "Loaded feature cache");
        }
        Ok(cache)
    }

    /// Save completed entries to the persistence path, if one is set.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        let mut entries: Vec<CacheEntry> = self
            .inner
            .iter()
            .filter_map(|r| {
                r.value().get().map(|document| CacheEntry {
                    gene_id: r.key().gene_id.clone(),
                    transcript_id: r.key().transcript_id.clone(),
                    document: document.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| (&a.gene_id, &a.transcript_id).cmp(&(&b.gene_id, &b.transcript_id)));

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &entries)?;
        tracing::info!(path = %path, entries = entries.len(), "Saved feature cache");
        Ok(())
    }

    /// Return the cached document for `key`, or build it with `build`.
    ///
    /// Concurrent callers for the same key wait on the first caller's build.
    pub async fn get_or_build<F, Fut>(
        &self,
        key: CacheKey,
        build: F,
    ) -> FeatureResult<FeatureDocument>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FeatureResult<FeatureDocument>>,
    {
        let cell = Arc::clone(self.inner.entry(key.clone()).or_default().value());

        if let Some(document) = cell.get() {
            metrics::record_cache_event("hit");
            return Ok(document.clone());
        }

        metrics::record_cache_event("miss");
        let result = cell.get_or_try_init(build).await.cloned();
        if result.is_err() {
            self.inner.remove_if(&key, |_, cell| !cell.initialized());
        }
        result
    }

    pub fn get(&self, key: &CacheKey) -> Option<FeatureDocument> {
        self.inner.get(key).and_then(|r| r.value().get().cloned())
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.inner.iter().filter(|r| r.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
