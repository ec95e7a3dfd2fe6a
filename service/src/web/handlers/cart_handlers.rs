// service/src/web/handlers/cart_handlers.rs

use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use cartkeep::{CartView, ShippingQuote};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const MAX_LINE_QUANTITY: i32 = 99;
const DEFAULT_SHIPPING_TYPE: &str = "standard";

// --- Caller identity ---
// The authentication gateway in front of this service verifies the caller and
// forwards the user id in a header.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: String,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .map(str::trim)
      .filter(|value| !value.is_empty());

    match user_id {
      Some(user_id) => futures_util::future::ready(Ok(AuthenticatedUser {
        user_id: user_id.to_string(),
      })),
      None => {
        warn!("AuthenticatedUser extractor: Missing or blank {} header.", USER_ID_HEADER);
        futures_util::future::ready(Err(AppError::Auth(format!(
          "User authentication required. Missing or blank {} header.",
          USER_ID_HEADER
        ))))
      }
    }
  }
}

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddLineRequestPayload {
  pub product_id: String,
  pub quantity: i32,
  #[serde(default)]
  pub shipping_fee: f64,
  #[serde(default)]
  pub shipping_type: Option<String>,
  #[serde(default)]
  pub shipping_days: i32,
}

impl AddLineRequestPayload {
  fn validate(&self) -> Result<ShippingQuote, AppError> {
    if self.product_id.trim().is_empty() {
      return Err(AppError::Validation("product_id must not be empty".to_string()));
    }
    if !(1..=MAX_LINE_QUANTITY).contains(&self.quantity) {
      return Err(AppError::Validation(format!(
        "quantity must be between 1 and {}",
        MAX_LINE_QUANTITY
      )));
    }
    if !self.shipping_fee.is_finite() || self.shipping_fee < 0.0 {
      return Err(AppError::Validation("shipping_fee must be a non-negative number".to_string()));
    }
    if self.shipping_days < 0 {
      return Err(AppError::Validation("shipping_days must not be negative".to_string()));
    }

    let kind = self
      .shipping_type
      .as_deref()
      .map(str::trim)
      .filter(|kind| !kind.is_empty())
      .unwrap_or(DEFAULT_SHIPPING_TYPE);
    Ok(ShippingQuote::new(self.shipping_fee, kind, self.shipping_days))
  }
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityRequestPayload {
  pub quantity: i32,
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let ctx = app_state.call_context();

  let view = match app_state.views.compose(&ctx, &auth_user.user_id).await {
    Ok(view) => view,
    // No cart yet is presented as an empty one.
    Err(e) if e.is_not_found() => CartView::empty(Utc::now()),
    Err(e) => return Err(e.into()),
  };

  info!("Cart view composed with {} items.", view.items.len());
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(
  name = "handler::add_line",
  skip(app_state, req_payload, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_line_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddLineRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let shipping = req_payload.validate()?;
  let ctx = app_state.call_context();

  app_state
    .carts
    .add_line(
      &ctx,
      &auth_user.user_id,
      req_payload.product_id.trim(),
      req_payload.quantity,
      &shipping,
    )
    .await?;

  info!("Line added to cart.");
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(
  name = "handler::set_line_quantity",
  skip(app_state, path, req_payload, auth_user),
  fields(user_id = %auth_user.user_id, line_id = %path.as_str(), quantity = %req_payload.quantity)
)]
pub async fn set_line_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<SetQuantityRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  if !(0..=MAX_LINE_QUANTITY).contains(&req_payload.quantity) {
    return Err(AppError::Validation(format!(
      "quantity must be between 0 and {}",
      MAX_LINE_QUANTITY
    )));
  }
  let ctx = app_state.call_context();

  app_state
    .carts
    .set_line_quantity(&ctx, &auth_user.user_id, path.as_str(), req_payload.quantity)
    .await?;

  Ok(HttpResponse::NoContent().finish())
}

#[instrument(
  name = "handler::remove_line",
  skip(app_state, path, auth_user),
  fields(user_id = %auth_user.user_id, line_id = %path.as_str())
)]
pub async fn remove_line_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let ctx = app_state.call_context();
  app_state
    .carts
    .remove_line(&ctx, &auth_user.user_id, path.as_str())
    .await?;

  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let ctx = app_state.call_context();
  app_state.carts.clear(&ctx, &auth_user.user_id).await?;

  info!("Cart cleared.");
  Ok(HttpResponse::NoContent().finish())
}
