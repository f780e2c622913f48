use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use teamspace_core::{AccountId, DomainError, UserId};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::BadParams(msg) => json_error(StatusCode::BAD_REQUEST, "bad_params", msg),
        DomainError::BadRequest(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "bad_request", msg)
        }
        DomainError::Unauthorized(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_account_id(s: &str) -> Result<AccountId, axum::response::Response> {
    s.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("{s} is not a valid account id"),
        )
    })
}

pub fn parse_user_id(s: &str) -> Result<UserId, axum::response::Response> {
    s.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("{s} is not a valid user id"),
        )
    })
}
