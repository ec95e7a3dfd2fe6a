// service/src/web/routes.rs

use actix_web::{error, web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{cart_handlers, health_handlers};

// Malformed or mistyped bodies get the same error payload as every other failure.
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(json_error_handler)
}

// Called in `main.rs` (and the API tests) to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(json_config())
    .route("/health", web::get().to(health_handlers::health_check_handler))
    .service(
      web::scope("/cart")
        .route("", web::get().to(cart_handlers::get_cart_handler))
        .route("/", web::get().to(cart_handlers::get_cart_handler))
        .route("", web::delete().to(cart_handlers::clear_cart_handler))
        .route("/", web::delete().to(cart_handlers::clear_cart_handler))
        .route("/items", web::post().to(cart_handlers::add_line_handler))
        .route(
          "/items/{line_id}",
          web::put().to(cart_handlers::set_line_quantity_handler),
        )
        .route(
          "/items/{line_id}",
          web::delete().to(cart_handlers::remove_line_handler),
        ),
    );
}
