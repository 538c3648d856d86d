use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portfolio_models::contact::ValidationErrors;

use crate::{models::ApiError, ErrorPolicy};

pub mod contact;
pub mod health;
pub mod portfolio;

pub async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Route not found")
}

pub fn internal_server_error(err: impl Into<anyhow::Error>, policy: ErrorPolicy) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    detailed_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
        format!("{err:#}"),
        policy,
    )
}

pub(crate) fn error(code: StatusCode, message: impl Into<Cow<'static, str>>) -> Response {
    (
        code,
        Json(ApiError {
            success: false,
            message: message.into(),
            error: None,
            errors: None,
        }),
    )
        .into_response()
}

fn detailed_error(
    code: StatusCode,
    message: impl Into<Cow<'static, str>>,
    detail: String,
    policy: ErrorPolicy,
) -> Response {
    (
        code,
        Json(ApiError {
            success: false,
            message: message.into(),
            error: policy.expose_internal.then_some(detail),
            errors: None,
        }),
    )
        .into_response()
}

fn validation_error(errors: ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            success: false,
            message: "Validation failed".into(),
            error: None,
            errors: Some(errors.0.into_iter().map(Into::into).collect()),
        }),
    )
        .into_response()
}
