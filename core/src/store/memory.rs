// cartkeep/src/store/memory.rs

use super::{DocumentStore, SwapOutcome};
use crate::error::CartResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
  value: String,
  expires_at: Option<Instant>,
}

impl Entry {
  fn is_live(&self, now: Instant) -> bool {
    self.expires_at.map_or(true, |at| now < at)
  }
}

/// In-process `DocumentStore`.
///
/// Expiration is measured on the tokio clock, so tests running with paused time
/// can advance past a TTL deterministically. Expired entries are dropped lazily
/// on access.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
  entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryDocumentStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of live documents.
  pub fn len(&self) -> usize {
    let now = Instant::now();
    self.entries.lock().values().filter(|e| e.is_live(now)).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Time left before `key` expires. `None` if the key is absent or never expires.
  pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
    let now = Instant::now();
    let guard = self.entries.lock();
    let entry = guard.get(key).filter(|e| e.is_live(now))?;
    entry.expires_at.map(|at| at.saturating_duration_since(now))
  }

  /// Writes `value` unconditionally, bypassing the CAS check.
  pub fn put(&self, key: &str, value: impl Into<String>) {
    self.entries.lock().insert(
      key.to_string(),
      Entry {
        value: value.into(),
        expires_at: None,
      },
    );
  }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
  async fn get(&self, key: &str) -> CartResult<Option<String>> {
    let now = Instant::now();
    let mut guard = self.entries.lock();
    let live = guard.get(key).map(|e| e.is_live(now));
    match live {
      Some(true) => Ok(guard.get(key).map(|e| e.value.clone())),
      Some(false) => {
        guard.remove(key);
        Ok(None)
      }
      None => Ok(None),
    }
  }

  async fn compare_and_swap(
    &self,
    key: &str,
    expected: Option<&str>,
    value: &str,
    ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    let now = Instant::now();
    let mut guard = self.entries.lock();

    let current = guard.get(key).filter(|e| e.is_live(now)).map(|e| e.value.as_str());
    if current != expected {
      return Ok(SwapOutcome::Conflict);
    }

    guard.insert(
      key.to_string(),
      Entry {
        value: value.to_string(),
        expires_at: ttl.and_then(|d| now.checked_add(d)),
      },
    );
    Ok(SwapOutcome::Applied)
  }
}
