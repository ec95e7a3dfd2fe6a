// service/src/web/handlers/health_handlers.rs

use actix_web::HttpResponse;

// Liveness only; Redis and Postgres failures surface on the cart routes.
pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
