use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::Response,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::routes;

/// Accepts the body either as JSON or as an urlencoded form, depending on
/// the content type. Browsers submitting a plain `<form>` get the same
/// treatment as the JSON frontend.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let invalid_body = || routes::error(StatusCode::BAD_REQUEST, "Invalid request body");

        let value = if content_type.starts_with("application/x-www-form-urlencoded") {
            Form::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|_| invalid_body())?
        } else {
            Json::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|_| invalid_body())?
        };

        Ok(Self(value))
    }
}
