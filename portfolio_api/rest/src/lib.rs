use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::Router;
use portfolio_audit_contracts::AuditLogService;
use portfolio_core_catalog_contracts::CatalogFeatureService;
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_core_health_contracts::HealthFeatureService;
use portfolio_shared_contracts::time::TimeService;
use portfolio_utils::Apply;
use tokio::net::TcpListener;

mod extractors;
mod middlewares;
mod models;
mod routes;

pub use middlewares::rate_limit::RateLimit;

#[derive(Debug, Clone)]
pub struct RestServer<Time, Health, Contact, Catalog, Audit> {
    pub time: Time,
    pub health: Health,
    pub contact: Contact,
    pub catalog: Catalog,
    pub audit: Audit,
    pub config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Deployment tag reported by the health endpoint ("development",
    /// "production", ...).
    pub environment: String,
    /// Whether 5xx responses carry the underlying error message. Only
    /// enabled in development.
    pub expose_internal_errors: bool,
    pub allowed_origins: Vec<String>,
    pub real_ip: Option<Arc<RealIpConfig>>,
    pub general_rate_limit: RateLimit,
    pub contact_rate_limit: RateLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

/// Controls how much an error response reveals about its cause.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ErrorPolicy {
    pub expose_internal: bool,
}

impl<Time, Health, Contact, Catalog, Audit> RestServer<Time, Health, Contact, Catalog, Audit>
where
    Time: TimeService,
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
    Catalog: CatalogFeatureService,
    Audit: AuditLogService,
{
    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let policy = ErrorPolicy {
            expose_internal: self.config.expose_internal_errors,
        };
        let audit: Arc<Audit> = self.audit.into();
        let time: Arc<Time> = self.time.into();

        Router::new()
            .merge(routes::health::router(
                self.health.into(),
                self.config.environment.clone(),
            ))
            .merge(
                routes::contact::router(self.contact.into(), policy).map(
                    middlewares::rate_limit::add(
                        self.config.contact_rate_limit,
                        "Too many contact form submissions, please try again later.",
                    ),
                ),
            )
            .merge(routes::portfolio::router(
                self.catalog.into(),
                Arc::clone(&audit),
                Arc::clone(&time),
            ))
            .fallback(routes::not_found)
            .map(middlewares::rate_limit::add(
                self.config.general_rate_limit,
                "Too many requests from this IP, please try again later.",
            ))
            .map(middlewares::cors::add(&self.config.allowed_origins))
            .map(middlewares::panic_handler::add)
            .map(middlewares::error_audit::add(audit, time))
            .map(middlewares::trace::add)
            .map(middlewares::request_id::add)
            .map(middlewares::client_ip::add(self.config.real_ip))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown signal handler: {err}");
    }
}
