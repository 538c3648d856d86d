use portfolio_core_catalog_contracts::ProjectFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiProjectsQuery {
    pub category: Option<String>,
    /// Only the literal string "true" restricts the listing, matching the
    /// query contract of the public frontend.
    pub featured: Option<String>,
}

impl From<ApiProjectsQuery> for ProjectFilter {
    fn from(value: ApiProjectsQuery) -> Self {
        Self {
            featured_only: value.featured.as_deref() == Some("true"),
            category: value.category,
        }
    }
}

/// Analytics beacon payload. Everything is optional; unknown shapes are
/// recorded as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAnalyticsEvent {
    pub page: Option<String>,
    pub event: Option<String>,
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct ApiStatus {
    pub success: bool,
}
