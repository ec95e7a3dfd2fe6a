// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use cart_service::config::AppConfig;
use cart_service::state::AppState;
use cartkeep::{CartError, CartResult, DocumentStore, MemoryCatalog, MemoryDocumentStore, Product, SwapOutcome};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Fixtures ---
pub fn product(id: &str, name: &str, price: i32) -> Product {
  let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
  Product {
    product_id: id.to_string(),
    product_name: name.to_string(),
    seller_id: "seller-1".to_string(),
    price,
    category_id: "cat-1".to_string(),
    summary: String::new(),
    product_condition: "new".to_string(),
    geo_id: "geo-1".to_string(),
    regist_day: ts,
    last_update: ts,
  }
}

pub fn config_from(vars: &[(&str, &str)]) -> cart_service::errors::Result<AppConfig> {
  let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
  AppConfig::from_lookup(|name| vars.get(name).cloned())
}

pub fn test_config() -> Arc<AppConfig> {
  Arc::new(config_from(&[("DATABASE_URL", "postgres://unused")]).unwrap())
}

pub struct TestBackends {
  pub state: AppState,
  pub documents: Arc<MemoryDocumentStore>,
  pub catalog: Arc<MemoryCatalog>,
}

/// App state wired to in-memory backends holding a small catalog.
pub fn memory_backends() -> TestBackends {
  let documents = Arc::new(MemoryDocumentStore::new());
  let catalog = Arc::new(MemoryCatalog::with_products([
    product("P1", "Kettle", 3200),
    product("P2", "Teapot", 4500),
  ]));
  let state = AppState::new(test_config(), documents.clone(), catalog.clone());
  TestBackends {
    state,
    documents,
    catalog,
  }
}

pub fn state_with_documents(documents: Arc<dyn DocumentStore>) -> AppState {
  AppState::new(test_config(), documents, Arc::new(MemoryCatalog::new()))
}

// --- Document stores with scripted behavior ---

/// Rejects every conditional write.
#[derive(Debug, Default)]
pub struct AlwaysConflictStore {
  pub swaps: AtomicU32,
}

#[async_trait]
impl DocumentStore for AlwaysConflictStore {
  async fn get(&self, _key: &str) -> CartResult<Option<String>> {
    Ok(None)
  }

  async fn compare_and_swap(
    &self,
    _key: &str,
    _expected: Option<&str>,
    _value: &str,
    _ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    self.swaps.fetch_add(1, Ordering::SeqCst);
    Ok(SwapOutcome::Conflict)
  }
}

/// Fails every call as an unreachable backend would.
#[derive(Debug, Default)]
pub struct UnreachableStore;

#[async_trait]
impl DocumentStore for UnreachableStore {
  async fn get(&self, _key: &str) -> CartResult<Option<String>> {
    Err(CartError::upstream("redis", anyhow::anyhow!("connection refused (os error 111)")))
  }

  async fn compare_and_swap(
    &self,
    _key: &str,
    _expected: Option<&str>,
    _value: &str,
    _ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    Err(CartError::upstream("redis", anyhow::anyhow!("connection refused (os error 111)")))
  }
}

// --- Tracing Setup for Tests ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Ignore error if already initialized
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
