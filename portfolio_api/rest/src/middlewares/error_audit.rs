//! Appends an error-category audit entry for every 5xx response, including
//! panics the panic handler converted into one.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header::USER_AGENT, StatusCode},
    middleware::{from_fn, Next},
    Router,
};
use portfolio_audit_contracts::{AuditCategory, AuditEntry, AuditLogService, AuditStatus};
use portfolio_models::client::ClientInfo;
use portfolio_shared_contracts::time::TimeService;

use crate::middlewares::client_ip::ClientIp;

pub fn add(
    audit: Arc<impl AuditLogService>,
    time: Arc<impl TimeService>,
) -> impl FnOnce(Router) -> Router {
    move |router| {
        router.layer(from_fn(move |request: Request, next: Next| {
            let audit = Arc::clone(&audit);
            let time = Arc::clone(&time);
            async move {
                let method = request.method().as_str().to_owned();
                let path = request.uri().path().to_owned();
                let client = ClientInfo {
                    ip: request.extensions().get::<ClientIp>().map(|ip| ip.0),
                    user_agent: request
                        .headers()
                        .get(USER_AGENT)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_owned),
                };

                let response = next.run(request).await;
                record_failure(&*audit, &*time, &client, &method, &path, response.status()).await;
                response
            }
        }))
    }
}

async fn record_failure(
    audit: &impl AuditLogService,
    time: &impl TimeService,
    client: &ClientInfo,
    method: &str,
    path: &str,
    status: StatusCode,
) {
    if !status.is_server_error() {
        return;
    }

    let entry = AuditEntry::new(time.now(), AuditStatus::Error)
        .with_client(client)
        .with_error(format!("{method} {path} responded {status}"))
        .with_field("method", method)
        .with_field("path", path)
        .with_field("status", status.as_u16());
    audit.record(AuditCategory::Error, entry).await;
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use portfolio_audit_contracts::MockAuditLogService;
    use portfolio_shared_contracts::time::MockTimeService;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn client() -> ClientInfo {
        ClientInfo {
            ip: Some("1.2.3.4".parse().unwrap()),
            user_agent: Some("test-agent".into()),
        }
    }

    #[tokio::test]
    async fn server_errors_are_recorded() {
        // Arrange
        let entry = AuditEntry::new(now(), AuditStatus::Error)
            .with_client(&client())
            .with_error("POST /api/contact/send responded 500 Internal Server Error")
            .with_field("method", "POST")
            .with_field("path", "/api/contact/send")
            .with_field("status", 500u16);
        let audit = MockAuditLogService::new().with_record(AuditCategory::Error, entry);
        let time = MockTimeService::new().with_now(now());

        // Act (the mock asserts the expected entry)
        record_failure(
            &audit,
            &time,
            &client(),
            "POST",
            "/api/contact/send",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .await;
    }

    #[tokio::test]
    async fn other_statuses_are_not_recorded() {
        // Arrange: no expectations, any record call panics
        let audit = MockAuditLogService::new();
        let time = MockTimeService::new();

        // Act
        for status in [
            StatusCode::OK,
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::TOO_MANY_REQUESTS,
        ] {
            record_failure(&audit, &time, &client(), "GET", "/api/portfolio/data", status).await;
        }
    }
}
