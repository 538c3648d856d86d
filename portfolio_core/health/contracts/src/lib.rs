use std::{future::Future, time::Duration};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait HealthFeatureService: Send + Sync + 'static {
    fn status(&self) -> impl Future<Output = HealthStatus> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    /// Whether the SMTP server responded to the last (possibly cached) ping.
    pub email: bool,
    pub uptime: Duration,
}

#[cfg(feature = "mock")]
impl MockHealthFeatureService {
    pub fn with_status(mut self, status: HealthStatus) -> Self {
        self.expect_status()
            .once()
            .return_once(move || Box::pin(std::future::ready(status)));
        self
    }
}
