use std::future::Future;

use chrono::{DateTime, Utc};
use portfolio_email_contracts::EmailSendError;
use portfolio_models::{
    client::ClientInfo,
    contact::{ContactRequest, ValidationErrors},
};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Runs the full contact pipeline for one submission: validate, render
    /// both emails, deliver the internal notification, deliver the
    /// auto-reply, append the audit entry.
    fn submit(
        &self,
        request: ContactRequest,
        client: ClientInfo,
    ) -> impl Future<Output = Result<ContactReceipt, ContactSubmitError>> + Send;

    /// Validates the address and appends it to the newsletter log.
    fn subscribe(
        &self,
        email: String,
        client: ClientInfo,
    ) -> impl Future<Output = Result<(), SubscribeError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReceipt {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Failed to send message.")]
    Send(#[source] EmailSendError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("{0}")]
    InvalidEmail(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        request: ContactRequest,
        client: ClientInfo,
        result: Result<ContactReceipt, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(
                mockall::predicate::eq(request),
                mockall::predicate::eq(client),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_subscribe(
        mut self,
        email: String,
        client: ClientInfo,
        result: Result<(), SubscribeError>,
    ) -> Self {
        self.expect_subscribe()
            .once()
            .with(mockall::predicate::eq(email), mockall::predicate::eq(client))
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
