use std::future::Future;

use chrono::{DateTime, Utc};
use portfolio_models::client::ClientInfo;
use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait AuditLogService: Send + Sync + 'static {
    /// Appends one entry to the log of the given category. Fire and forget:
    /// write failures are reported to the server's own diagnostic channel
    /// and never reach the caller.
    fn record(&self, category: AuditCategory, entry: AuditEntry)
        -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditCategory {
    Contact,
    Newsletter,
    Analytics,
    Error,
}

impl AuditCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditCategory::Contact => "contact",
            AuditCategory::Newsletter => "newsletter",
            AuditCategory::Analytics => "analytics",
            AuditCategory::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
}

/// One log line. Serialized as a single flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub status: AuditStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<std::net::IpAddr>,
    #[serde(rename = "userAgent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl AuditEntry {
    pub fn new(timestamp: DateTime<Utc>, status: AuditStatus) -> Self {
        Self {
            timestamp,
            status,
            ip: None,
            user_agent: None,
            error: None,
            fields: Default::default(),
        }
    }

    pub fn with_client(mut self, client: &ClientInfo) -> Self {
        self.ip = client.ip;
        self.user_agent = client.user_agent.clone();
        self
    }

    pub fn with_error(mut self, error: impl std::fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

#[cfg(feature = "mock")]
impl MockAuditLogService {
    pub fn with_record(mut self, category: AuditCategory, entry: AuditEntry) -> Self {
        self.expect_record()
            .once()
            .with(
                mockall::predicate::eq(category),
                mockall::predicate::eq(entry),
            )
            .return_once(|_, _| Box::pin(std::future::ready(())));
        self
    }
}
