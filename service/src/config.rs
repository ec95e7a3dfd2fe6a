// service/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use cartkeep::CartStoreOptions;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Redis caps `PX` at `i64::MAX` milliseconds.
pub const MAX_CART_TTL_SECONDS: u64 = i64::MAX as u64 / 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  // Product catalog (Postgres)
  pub database_url: String,
  pub database_max_connections: u32,

  // Cart documents (Redis)
  pub redis_url: String,
  /// `0` means carts never expire.
  pub cart_ttl_seconds: u64,
  pub cart_max_retries: u32,

  /// Per-request deadline for store and catalog calls. `0` disables it.
  pub request_timeout_ms: u64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable source.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "0.0.0.0");
    let server_port = parse_var("SERVER_PORT", get_or("SERVER_PORT", "50053"))?;

    let database_url = lookup("DATABASE_URL")
      .ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;
    let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", get_or("DATABASE_MAX_CONNECTIONS", "25"))?;

    let redis_url = get_or("REDIS_URL", "redis://127.0.0.1:6379/0");
    let cart_ttl_seconds: u64 = parse_var("CART_TTL_SECONDS", get_or("CART_TTL_SECONDS", "0"))?;
    if cart_ttl_seconds > MAX_CART_TTL_SECONDS {
      return Err(AppError::Config(format!(
        "CART_TTL_SECONDS must be at most {}",
        MAX_CART_TTL_SECONDS
      )));
    }
    let cart_max_retries: u32 = parse_var("CART_MAX_RETRIES", get_or("CART_MAX_RETRIES", "10"))?;
    if cart_max_retries == 0 {
      return Err(AppError::Config("CART_MAX_RETRIES must be at least 1".to_string()));
    }

    let request_timeout_ms = parse_var("REQUEST_TIMEOUT_MS", get_or("REQUEST_TIMEOUT_MS", "5000"))?;

    tracing::info!("Application configuration loaded successfully.");
    // Connection URLs may carry credentials; keep them out of the logs.
    tracing::debug!(
      server_host = %server_host,
      server_port,
      cart_ttl_seconds,
      cart_max_retries,
      request_timeout_ms,
      "Loaded config details"
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      redis_url,
      cart_ttl_seconds,
      cart_max_retries,
      request_timeout_ms,
    })
  }

  pub fn cart_store_options(&self) -> CartStoreOptions {
    CartStoreOptions::default()
      .with_ttl_seconds(self.cart_ttl_seconds)
      .with_max_retries(self.cart_max_retries)
  }

  pub fn request_timeout(&self) -> Option<Duration> {
    (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: String) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e)))
}
