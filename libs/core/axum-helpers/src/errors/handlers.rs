use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        "The requested resource was not found",
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}

pub async fn method_not_allowed() -> Response {
    let code = ErrorCode::MethodNotAllowed;
    let body = Json(ErrorResponse::new(code, code.default_message()));

    (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
}
