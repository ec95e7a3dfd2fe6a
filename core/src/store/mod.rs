// cartkeep/src/store/mod.rs

//! Keyed document storage and the optimistic cart store built on top of it.

pub mod cart_store;
pub mod memory;

use crate::error::CartResult;
use async_trait::async_trait;
use std::time::Duration;

pub use cart_store::{CartStore, CartStoreOptions};
pub use memory::MemoryDocumentStore;

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
  Applied,
  /// The stored value no longer matched what the writer read.
  Conflict,
}

/// A remote keyed store offering single-key compare-and-swap.
///
/// Implementations must be safe to share between concurrent requests; the cart
/// store keeps no state of its own beyond a handle to one of these.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  /// Returns the raw document stored under `key`, or `None` if absent or expired.
  async fn get(&self, key: &str) -> CartResult<Option<String>>;

  /// Stores `value` under `key` only if the current value equals `expected`
  /// (`None` meaning the key must be absent).
  ///
  /// `ttl: Some(d)` expires the key `d` after this write; `None` persists it and
  /// clears any earlier expiration.
  async fn compare_and_swap(
    &self,
    key: &str,
    expected: Option<&str>,
    value: &str,
    ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome>;
}
