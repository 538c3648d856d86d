use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_health_contracts::{HealthFeatureService, HealthStatus};
use serde::Serialize;

pub fn router(service: Arc<impl HealthFeatureService>, environment: String) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state((service, environment))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    /// Seconds since the server started.
    uptime: u64,
    environment: String,
    email: bool,
}

async fn health(
    State((service, environment)): State<(Arc<impl HealthFeatureService>, String)>,
) -> Response {
    let HealthStatus { email, uptime } = service.status().await;

    let status = if email {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let response = HealthResponse {
        status: if email { "OK" } else { "DEGRADED" },
        uptime: uptime.as_secs(),
        environment,
        email,
    };

    (status, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use portfolio_core_health_contracts::MockHealthFeatureService;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::routes::testing::body_json;

    #[tokio::test]
    async fn reports_ok() {
        // Arrange
        let service = MockHealthFeatureService::new().with_status(HealthStatus {
            email: true,
            uptime: Duration::from_secs(4711),
        });

        // Act
        let response = health(State((Arc::new(service), "development".into()))).await;

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["uptime"], 4711);
        assert_eq!(body["environment"], "development");
        assert_eq!(body["email"], true);
    }

    #[tokio::test]
    async fn reports_degraded_when_smtp_is_down() {
        let service = MockHealthFeatureService::new().with_status(HealthStatus {
            email: false,
            uptime: Duration::from_secs(7),
        });

        let response = health(State((Arc::new(service), "production".into()))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["status"], "DEGRADED");
        assert_eq!(body["email"], false);
    }
}
