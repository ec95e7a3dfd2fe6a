// cartkeep/src/catalog.rs

//! Batched product lookup against the catalog.

use crate::context::CallContext;
use crate::error::CartResult;
use crate::model::Product;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Source of product records, typically a relational catalog.
#[async_trait]
pub trait ProductRepo: Send + Sync {
  /// Fetches the products whose id is in `ids`. Ids with no match are simply
  /// missing from the result. Output order is unspecified.
  async fn fetch_by_ids(&self, ids: &[String]) -> CartResult<Vec<Product>>;
}

/// De-duplicating front for a `ProductRepo`.
#[derive(Clone)]
pub struct CatalogLookup {
  repo: Arc<dyn ProductRepo>,
}

impl std::fmt::Debug for CatalogLookup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CatalogLookup").finish_non_exhaustive()
  }
}

impl CatalogLookup {
  pub fn new(repo: Arc<dyn ProductRepo>) -> Self {
    Self { repo }
  }

  /// Returns the found products keyed by id. An empty id set returns immediately
  /// without touching the repository.
  #[instrument(name = "CatalogLookup::get_by_ids", skip_all, fields(requested = ids.len()), err(Display))]
  pub async fn get_by_ids(&self, ctx: &CallContext, ids: &[String]) -> CartResult<HashMap<String, Product>> {
    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<String> = ids.iter().filter(|id| seen.insert(id.as_str())).cloned().collect();
    if unique.is_empty() {
      return Ok(HashMap::new());
    }

    let products = ctx.run(self.repo.fetch_by_ids(&unique)).await?;
    debug!(unique = unique.len(), found = products.len(), "catalog batch fetched");

    Ok(products.into_iter().map(|p| (p.product_id.clone(), p)).collect())
  }
}

/// In-memory catalog for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
  products: RwLock<HashMap<String, Product>>,
}

impl MemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
    let catalog = Self::new();
    for p in products {
      catalog.insert(p);
    }
    catalog
  }

  pub fn insert(&self, product: Product) {
    self.products.write().insert(product.product_id.clone(), product);
  }

  /// Deletes a product, leaving any cart line that references it dangling.
  pub fn remove(&self, product_id: &str) -> Option<Product> {
    self.products.write().remove(product_id)
  }
}

#[async_trait]
impl ProductRepo for MemoryCatalog {
  async fn fetch_by_ids(&self, ids: &[String]) -> CartResult<Vec<Product>> {
    let guard = self.products.read();
    Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
  }
}
