// service/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use cartkeep::{CancelReason, CartError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error(transparent)]
  Cart(#[from] CartError),
}

impl AppError {
  /// Machine-readable kind sent alongside the human message.
  pub fn kind(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "validation_error",
      AppError::Auth(_) => "unauthorized",
      AppError::Config(_) => "config_error",
      AppError::Cart(e) => e.kind(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Cart(e) => match e {
        CartError::NotFound { .. } => StatusCode::NOT_FOUND,
        CartError::Validation(_) => StatusCode::BAD_REQUEST,
        // Transient: the whole request is safe to retry.
        CartError::ConflictExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CartError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        CartError::Cancelled(CancelReason::DeadlineExceeded | CancelReason::Requested) => StatusCode::GATEWAY_TIMEOUT,
      },
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, kind = self.kind(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, kind = self.kind(), "Rejecting request");
    }

    // Upstream details can leak infrastructure; keep them in the logs only.
    let message = match self {
      AppError::Cart(CartError::Upstream { service, .. }) => format!("Upstream '{}' unavailable", service),
      AppError::Config(_) => "An internal error occurred".to_string(),
      other => other.to_string(),
    };

    HttpResponse::build(status).json(json!({ "kind": self.kind(), "error": message }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
