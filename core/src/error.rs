// cartkeep/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Why a call context stopped an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
  /// The caller's deadline elapsed.
  DeadlineExceeded,
  /// The caller explicitly requested cancellation.
  Requested,
}

impl std::fmt::Display for CancelReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
      CancelReason::Requested => f.write_str("cancelled by caller"),
    }
  }
}

/// The conditional write on `key` was rejected because the document changed
/// between the read and the write.
#[derive(Debug, Clone, Error)]
#[error("key '{key}' changed concurrently (attempt {attempt})")]
pub struct ConflictError {
  pub key: String,
  pub attempt: u32,
}

#[derive(Debug, Error)]
pub enum CartError {
  /// No cart document exists for the user yet. Callers usually present this as an empty cart.
  #[error("cart not found for user '{user_id}'")]
  NotFound { user_id: String },

  #[error("validation failed: {0}")]
  Validation(String),

  /// The optimistic retry budget ran out under sustained contention on one key.
  #[error("cart update conflict after {attempts} attempts")]
  ConflictExhausted {
    attempts: u32,
    #[source]
    source: ConflictError,
  },

  /// Transport or decoding failure talking to the document store or the catalog.
  #[error("upstream '{service}' unavailable: {source}")]
  Upstream {
    service: &'static str,
    #[source]
    source: AnyhowError,
  },

  #[error("operation cancelled: {0}")]
  Cancelled(CancelReason),
}

impl CartError {
  pub fn upstream(service: &'static str, err: impl Into<AnyhowError>) -> Self {
    CartError::Upstream {
      service,
      source: err.into(),
    }
  }

  /// Machine-readable error kind, stable across releases.
  pub fn kind(&self) -> &'static str {
    match self {
      CartError::NotFound { .. } => "not_found",
      CartError::Validation(_) => "validation_error",
      CartError::ConflictExhausted { .. } => "conflict_exhausted",
      CartError::Upstream { .. } => "upstream_unavailable",
      CartError::Cancelled(_) => "cancelled",
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, CartError::NotFound { .. })
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
