//! Catalog provider trait and the in-memory backend

use async_trait::async_trait;

use super::{CatalogData, CatalogError};

/// Source of raw catalog data
///
/// The engine fetches once per session; the catalog is immutable afterwards.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch(&self) -> Result<CatalogData, CatalogError>;
}

/// In-memory provider backed by a fixed payload
///
/// Used by tests and by front ends that ship a static menu.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogProvider {
    data: CatalogData,
}

impl StaticCatalogProvider {
    pub fn new(data: CatalogData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalogProvider {
    async fn fetch(&self) -> Result<CatalogData, CatalogError> {
        Ok(self.data.clone())
    }
}
