// service/src/main.rs

use anyhow::Context;
use cart_service::config::AppConfig;
use cart_service::db::{PgProductRepo, RedisDocumentStore};
use cart_service::state::AppState;
use cart_service::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  // RUST_LOG overrides the default level; LOG_FORMAT=json for log shippers.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match std::env::var("LOG_FORMAT").as_deref() {
    Ok("json") => builder.json().init(),
    _ => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  tracing::info!("Starting cart service...");

  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);

  let db_pool = PgPoolOptions::new()
    .max_connections(app_config.database_max_connections)
    .connect(&app_config.database_url)
    .await
    .context("Failed to connect to the product database")?;
  tracing::info!("Successfully connected to the database.");

  let documents = RedisDocumentStore::connect(&app_config.redis_url)
    .await
    .context("Failed to connect to Redis")?;
  tracing::info!("Successfully connected to Redis.");

  let app_state = AppState::new(
    app_config.clone(),
    Arc::new(documents),
    Arc::new(PgProductRepo::new(db_pool)),
  );

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  tracing::info!("Cart service stopped.");
  Ok(())
}
