//! Cached, normalized product catalog backed by a [`ProductSource`].
//!
//! The first access loads the source once; later accesses share the same
//! [`Catalog`] until [`ProductStore::invalidate`] drops it. A failed load
//! leaves the cache empty so the next request tries again.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::normalize::{normalize, NormalizeError};
use crate::product::Product;
use crate::query::{search, SearchCriteria, SearchOptions};
use crate::source::{ProductSource, SourceError};

/// A raw record the normalizer refused, with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub position: usize,
    pub error: NormalizeError,
}

/// One immutable snapshot of the normalized collection.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<i64, usize>,
    rejected: Vec<RejectedRecord>,
}

impl Catalog {
    /// Normalizes `records`, keeping load order and skipping rejected ones.
    ///
    /// When ids repeat, lookups resolve to the first occurrence.
    #[must_use]
    pub fn from_records(records: &[Value]) -> Self {
        let mut catalog = Self::default();
        for (position, raw) in records.iter().enumerate() {
            match normalize(raw) {
                Ok(product) => {
                    catalog
                        .index
                        .entry(product.id)
                        .or_insert(catalog.products.len());
                    catalog.products.push(product);
                }
                Err(error) => catalog.rejected.push(RejectedRecord { position, error }),
            }
        }
        catalog
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Product> {
        self.index.get(&id).map(|&i| &self.products[i])
    }

    /// All ids in load order.
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.products.iter().map(|p| p.id).collect()
    }

    #[must_use]
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

pub struct ProductStore<S> {
    source: S,
    cache: RwLock<Option<Arc<Catalog>>>,
}

impl<S: ProductSource> ProductStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the cached catalog, loading it on first access.
    ///
    /// Concurrent first accesses share a single load.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot be read; nothing is cached.
    pub async fn load(&self) -> Result<Arc<Catalog>, SourceError> {
        if let Some(catalog) = self.cached().await {
            return Ok(catalog);
        }

        let mut slot = self.cache.write().await;
        if let Some(catalog) = slot.as_ref() {
            return Ok(Arc::clone(catalog));
        }

        let records = self.source.fetch_records().await?;
        let catalog = Arc::new(Catalog::from_records(&records));
        *slot = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the catalog is not cached and cannot be loaded.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>, SourceError> {
        Ok(self.load().await?.get(id).cloned())
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the catalog is not cached and cannot be loaded.
    pub async fn list_ids(&self) -> Result<Vec<i64>, SourceError> {
        Ok(self.load().await?.ids())
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the catalog is not cached and cannot be loaded.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        options: &SearchOptions,
    ) -> Result<Vec<Product>, SourceError> {
        let catalog = self.load().await?;
        Ok(search(catalog.products(), criteria, options))
    }

    /// Drops the cached catalog. Returns whether one was cached.
    pub async fn invalidate(&self) -> bool {
        self.cache.write().await.take().is_some()
    }

    pub async fn is_loaded(&self) -> bool {
        self.cache.read().await.is_some()
    }

    async fn cached(&self) -> Option<Arc<Catalog>> {
        self.cache.read().await.clone()
    }
}
