use chrono::{DateTime, Utc};
use portfolio_models::contact::ContactRequest;
use serde::{Deserialize, Serialize};

/// Contact form payload. Fields arrive unvalidated; the contact feature
/// service performs all checks and reports per-field errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl From<ApiContactRequest> for ContactRequest {
    fn from(value: ApiContactRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
            phone: value.phone,
            company: value.company,
        }
    }
}

#[derive(Serialize)]
pub struct ApiContactResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSubscribeRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct ApiSubscribeResponse {
    pub success: bool,
    pub message: &'static str,
}
