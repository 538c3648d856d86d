use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSubmitError, SubscribeError};
use portfolio_models::client::ClientInfo;

use super::{detailed_error, error, internal_server_error, validation_error};
use crate::{
    extractors::{json_or_form::JsonOrForm, user_agent::UserAgent},
    middlewares::client_ip::ClientIp,
    models::contact::{
        ApiContactRequest, ApiContactResponse, ApiSubscribeRequest, ApiSubscribeResponse,
    },
    ErrorPolicy,
};

pub fn router(service: Arc<impl ContactFeatureService>, policy: ErrorPolicy) -> Router<()> {
    Router::new()
        .route("/api/contact/send", routing::post(send))
        .route("/api/contact/subscribe", routing::post(subscribe))
        .with_state((service, policy))
}

async fn send(
    State((service, policy)): State<(Arc<impl ContactFeatureService>, ErrorPolicy)>,
    Extension(client_ip): Extension<ClientIp>,
    user_agent: UserAgent,
    JsonOrForm(request): JsonOrForm<ApiContactRequest>,
) -> Response {
    let client = ClientInfo {
        ip: Some(client_ip.0),
        user_agent: user_agent.0,
    };

    match service.submit(request.into(), client).await {
        Ok(receipt) => Json(ApiContactResponse {
            success: true,
            message: receipt.message,
            timestamp: receipt.timestamp,
        })
        .into_response(),
        Err(ContactSubmitError::Validation(errors)) => validation_error(errors),
        Err(err @ ContactSubmitError::Send(_)) => {
            let err = anyhow::Error::new(err);
            tracing::error!("failed to deliver contact emails: {err:#}");
            detailed_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send message. Please try again later.",
                format!("{err:#}"),
                policy,
            )
        }
        Err(ContactSubmitError::Other(err)) => internal_server_error(err, policy),
    }
}

async fn subscribe(
    State((service, policy)): State<(Arc<impl ContactFeatureService>, ErrorPolicy)>,
    Extension(client_ip): Extension<ClientIp>,
    user_agent: UserAgent,
    JsonOrForm(request): JsonOrForm<ApiSubscribeRequest>,
) -> Response {
    let client = ClientInfo {
        ip: Some(client_ip.0),
        user_agent: user_agent.0,
    };

    match service.subscribe(request.email, client).await {
        Ok(()) => Json(ApiSubscribeResponse {
            success: true,
            message: "Successfully subscribed to newsletter!",
        })
        .into_response(),
        Err(SubscribeError::InvalidEmail(message)) => error(StatusCode::BAD_REQUEST, message),
        Err(SubscribeError::Other(err)) => internal_server_error(err, policy),
    }
}
