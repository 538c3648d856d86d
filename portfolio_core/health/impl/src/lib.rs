use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use portfolio_core_health_contracts::{HealthFeatureService, HealthStatus};
use portfolio_email_contracts::EmailService;
use portfolio_shared_contracts::time::TimeService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Time, Email> {
    pub time: Time,
    pub email: Email,
    pub config: HealthFeatureConfig,
    pub started_at: DateTime<Utc>,
    pub state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
pub struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    email: bool,
    timestamp: DateTime<Utc>,
}

impl<Time, Email> HealthFeatureService for HealthFeatureServiceImpl<Time, Email>
where
    Time: TimeService,
    Email: EmailService,
{
    async fn status(&self) -> HealthStatus {
        let now = self.time.now();
        let uptime = (now - self.started_at).to_std().unwrap_or_default();

        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return HealthStatus {
                email: cached.email,
                uptime,
            };
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return HealthStatus {
                email: cached.email,
                uptime,
            };
        }

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        *cache_guard = Some(CachedStatus {
            email,
            timestamp: now,
        });

        HealthStatus { email, uptime }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use portfolio_email_contracts::MockEmailService;
    use portfolio_shared_contracts::time::MockTimeService;

    use super::*;

    fn started_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn sut(
        time: MockTimeService,
        email: MockEmailService,
    ) -> HealthFeatureServiceImpl<MockTimeService, MockEmailService> {
        HealthFeatureServiceImpl {
            time,
            email,
            config: HealthFeatureConfig {
                cache_ttl: Duration::from_secs(10),
            },
            started_at: started_at(),
            state: Default::default(),
        }
    }

    #[tokio::test]
    async fn reports_email_ok_and_uptime() {
        // Arrange
        let time = MockTimeService::new().with_now(started_at() + Duration::from_secs(42));
        let email = MockEmailService::new().with_ping(Ok(()));

        let sut = sut(time, email);

        // Act
        let status = sut.status().await;

        // Assert
        assert_eq!(
            status,
            HealthStatus {
                email: true,
                uptime: Duration::from_secs(42),
            }
        );
    }

    #[tokio::test]
    async fn reports_email_down_on_ping_failure() {
        let time = MockTimeService::new().with_now(started_at());
        let email = MockEmailService::new().with_ping(Err(anyhow::anyhow!("connection refused")));

        let sut = sut(time, email);

        let status = sut.status().await;

        assert!(!status.email);
    }

    #[tokio::test]
    async fn status_is_cached_within_ttl() {
        let mut time = MockTimeService::new();
        let mut seq = mockall::Sequence::new();
        time.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(started_at());
        time.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(started_at() + Duration::from_secs(5));

        // Exactly one ping for two status calls.
        let email = MockEmailService::new().with_ping(Ok(()));

        let sut = sut(time, email);

        assert!(sut.status().await.email);
        assert!(sut.status().await.email);
    }

    #[tokio::test]
    async fn cache_expires_after_ttl() {
        let mut time = MockTimeService::new();
        let mut seq = mockall::Sequence::new();
        time.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(started_at());
        time.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(started_at() + Duration::from_secs(15));

        let email = MockEmailService::new().with_ping(Ok(())).with_ping(Ok(()));

        let sut = sut(time, email);

        assert!(sut.status().await.email);
        assert!(sut.status().await.email);
    }
}
