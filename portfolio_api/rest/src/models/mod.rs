use std::borrow::Cow;

use portfolio_models::contact::FieldError;
use serde::Serialize;

pub mod contact;
pub mod portfolio;

/// Error envelope shared by every non-2xx response.
#[derive(Serialize)]
pub struct ApiError {
    pub success: bool,
    pub message: Cow<'static, str>,
    /// Underlying error message, only populated in development.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiFieldError>>,
}

#[derive(Serialize)]
pub struct ApiFieldError {
    pub field: &'static str,
    pub message: String,
}

impl From<FieldError> for ApiFieldError {
    fn from(value: FieldError) -> Self {
        Self {
            field: value.field,
            message: value.message,
        }
    }
}

/// Success envelope for read endpoints.
#[derive(Serialize)]
pub struct ApiData<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiData<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
