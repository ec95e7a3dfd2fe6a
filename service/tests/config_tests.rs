// tests/config_tests.rs
mod common;

use cart_service::config::AppConfig;
use common::*;
use serial_test::serial;
use std::time::Duration;

#[test]
fn test_defaults_apply_when_only_database_url_is_set() {
  setup_tracing();
  let config = config_from(&[("DATABASE_URL", "postgres://localhost/catalog")]).unwrap();

  assert_eq!(config.bind_address(), "0.0.0.0:50053");
  assert_eq!(config.database_max_connections, 25);
  assert_eq!(config.redis_url, "redis://127.0.0.1:6379/0");
  assert_eq!(config.cart_max_retries, 10);
  assert_eq!(config.request_timeout(), Some(Duration::from_millis(5000)));

  let options = config.cart_store_options();
  assert_eq!(options.ttl, None);
  assert_eq!(options.max_retries, 10);
}

#[test]
fn test_overrides_are_parsed() {
  setup_tracing();
  let config = config_from(&[
    ("DATABASE_URL", "postgres://localhost/catalog"),
    ("SERVER_PORT", "8080"),
    ("CART_TTL_SECONDS", "3600"),
    ("CART_MAX_RETRIES", "3"),
    ("REQUEST_TIMEOUT_MS", "0"),
  ])
  .unwrap();

  assert_eq!(config.server_port, 8080);
  assert_eq!(config.request_timeout(), None);
  let options = config.cart_store_options();
  assert_eq!(options.ttl, Some(Duration::from_secs(3600)));
  assert_eq!(options.max_retries, 3);
}

#[test]
fn test_missing_database_url_is_rejected() {
  setup_tracing();
  let err = config_from(&[]).unwrap_err();
  assert!(err.to_string().contains("DATABASE_URL"));
}

#[test]
fn test_invalid_values_are_rejected() {
  setup_tracing();
  let err = config_from(&[("DATABASE_URL", "postgres://x"), ("SERVER_PORT", "eighty")]).unwrap_err();
  assert!(err.to_string().contains("SERVER_PORT"));

  let err = config_from(&[("DATABASE_URL", "postgres://x"), ("CART_MAX_RETRIES", "0")]).unwrap_err();
  assert!(err.to_string().contains("CART_MAX_RETRIES"));
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
  setup_tracing();
  std::env::set_var("DATABASE_URL", "postgres://env-host/catalog");
  std::env::set_var("CART_TTL_SECONDS", "60");

  let config = AppConfig::from_env().unwrap();
  assert_eq!(config.database_url, "postgres://env-host/catalog");
  assert_eq!(config.cart_ttl_seconds, 60);

  std::env::remove_var("DATABASE_URL");
  std::env::remove_var("CART_TTL_SECONDS");
}

#[test]
fn test_cart_ttl_is_bounded() {
  setup_tracing();
  let max = cart_service::config::MAX_CART_TTL_SECONDS.to_string();
  let config = config_from(&[("DATABASE_URL", "postgres://x"), ("CART_TTL_SECONDS", max.as_str())]).unwrap();
  assert_eq!(config.cart_ttl_seconds, cart_service::config::MAX_CART_TTL_SECONDS);

  let too_long = (cart_service::config::MAX_CART_TTL_SECONDS + 1).to_string();
  let err = config_from(&[("DATABASE_URL", "postgres://x"), ("CART_TTL_SECONDS", too_long.as_str())]).unwrap_err();
  assert!(err.to_string().contains("CART_TTL_SECONDS"));

  let err = config_from(&[("DATABASE_URL", "postgres://x"), ("CART_TTL_SECONDS", "18446744073709551615")]).unwrap_err();
  assert!(err.to_string().contains("CART_TTL_SECONDS"));
}
