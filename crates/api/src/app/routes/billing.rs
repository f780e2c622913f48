use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/setup-intent", get(setup_intent))
}

/// Issue a payment-collection intent for the billing UI. Account-agnostic;
/// only a valid session is required.
pub async fn setup_intent(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.accounts.setup_intent().await {
        Ok(intent) => {
            (StatusCode::OK, Json(dto::setup_intent_to_json(&intent))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
