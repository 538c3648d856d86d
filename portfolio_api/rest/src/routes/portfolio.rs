use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use portfolio_audit_contracts::{AuditCategory, AuditEntry, AuditLogService, AuditStatus};
use portfolio_core_catalog_contracts::CatalogFeatureService;
use portfolio_models::{
    catalog::{Catalog, ContactInfo, Project, SkillCategory, SocialLink},
    client::ClientInfo,
};
use portfolio_shared_contracts::time::TimeService;
use portfolio_utils::Apply;

use crate::{
    extractors::user_agent::UserAgent,
    middlewares::client_ip::ClientIp,
    models::{
        portfolio::{ApiAnalyticsEvent, ApiProjectsQuery, ApiStatus},
        ApiData,
    },
};

pub fn router(
    catalog: Arc<impl CatalogFeatureService>,
    audit: Arc<impl AuditLogService>,
    time: Arc<impl TimeService>,
) -> Router<()> {
    Router::new()
        .route("/api/portfolio/data", routing::get(data))
        .route("/api/portfolio/projects", routing::get(projects))
        .route("/api/portfolio/skills", routing::get(skills))
        .route("/api/portfolio/social", routing::get(social))
        .route("/api/portfolio/contact-info", routing::get(contact_info))
        .with_state(catalog)
        .merge(
            Router::new()
                .route("/api/portfolio/analytics", routing::post(analytics))
                .with_state((audit, time)),
        )
}

async fn data(service: State<Arc<impl CatalogFeatureService>>) -> Json<ApiData<Catalog>> {
    Json(ApiData::new(service.catalog()))
}

async fn projects(
    service: State<Arc<impl CatalogFeatureService>>,
    Query(query): Query<ApiProjectsQuery>,
) -> Json<ApiData<Vec<Project>>> {
    Json(ApiData::new(service.projects(query.into())))
}

async fn skills(service: State<Arc<impl CatalogFeatureService>>) -> Json<ApiData<Vec<SkillCategory>>> {
    Json(ApiData::new(service.skills()))
}

async fn social(service: State<Arc<impl CatalogFeatureService>>) -> Json<ApiData<Vec<SocialLink>>> {
    Json(ApiData::new(service.social_links()))
}

async fn contact_info(service: State<Arc<impl CatalogFeatureService>>) -> Json<ApiData<ContactInfo>> {
    Json(ApiData::new(service.contact_info()))
}

/// Records a frontend usage beacon. Failures are invisible to the caller,
/// an analytics problem must never break the page.
async fn analytics(
    State((audit, time)): State<(Arc<impl AuditLogService>, Arc<impl TimeService>)>,
    Extension(client_ip): Extension<ClientIp>,
    user_agent: UserAgent,
    payload: Result<Json<ApiAnalyticsEvent>, JsonRejection>,
) -> Response {
    let Ok(Json(event)) = payload else {
        return Json(ApiStatus { success: false }).into_response();
    };

    let client = ClientInfo {
        ip: Some(client_ip.0),
        user_agent: user_agent.0,
    };

    let entry = AuditEntry::new(time.now(), AuditStatus::Success)
        .with_client(&client)
        .apply_map(event.page, |entry, page| entry.with_field("page", page))
        .apply_map(event.event, |entry, name| entry.with_field("event", name))
        .apply_map(event.data, |entry, data| entry.with_field("data", data));

    audit.record(AuditCategory::Analytics, entry).await;

    Json(ApiStatus { success: true }).into_response()
}
