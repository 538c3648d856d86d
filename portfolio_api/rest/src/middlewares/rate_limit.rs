//! Fixed window rate limiting keyed on the resolved client address.

use std::{
    collections::HashMap,
    net::IpAddr,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{from_fn, Next},
    Router,
};
use chrono::{DateTime, Utc};

use crate::{middlewares::client_ip::ClientIp, routes};

/// How many windows a single limiter tracks before expired ones are swept
/// out on the next check.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub window: Duration,
    pub max: u64,
}

pub fn add<S: Clone + Send + Sync + 'static>(
    limit: RateLimit,
    message: &'static str,
) -> impl FnOnce(Router<S>) -> Router<S> {
    let limiter = Arc::new(FixedWindowLimiter::new(limit));
    move |router| {
        router.layer(from_fn(move |request: Request, next: Next| {
            let limiter = limiter.clone();
            async move {
                // Requests that bypass the client ip middleware (only
                // possible in tests) are not limited.
                let Some(ClientIp(ip)) = request.extensions().get::<ClientIp>().copied() else {
                    return next.run(request).await;
                };

                if limiter.check(ip) {
                    next.run(request).await
                } else {
                    routes::error(StatusCode::TOO_MANY_REQUESTS, message)
                }
            }
        }))
    }
}

#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: RateLimit,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: DateTime<Utc>,
    count: u64,
}

impl FixedWindowLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            windows: Default::default(),
        }
    }

    fn check(&self, key: IpAddr) -> bool {
        self.check_at(key, Utc::now())
    }

    /// Counts one request against `key` and reports whether it is still
    /// within the window's cap. The first request after a window expires
    /// starts a fresh window.
    fn check_at(&self, key: IpAddr, now: DateTime<Utc>) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, window| now < window.started_at + self.limit.window);
        }

        let window = windows.entry(key).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now >= window.started_at + self.limit.window {
            *window = Window {
                started_at: now,
                count: 0,
            };
        }

        if window.count >= self.limit.max {
            return false;
        }

        window.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn limiter(window_secs: u64, max: u64) -> FixedWindowLimiter {
        FixedWindowLimiter::new(RateLimit {
            window: Duration::from_secs(window_secs),
            max,
        })
    }

    #[test]
    fn allows_up_to_max_requests_within_window() {
        let limiter = limiter(3600, 5);
        let ip = "1.2.3.4".parse().unwrap();

        for i in 0..5 {
            assert!(limiter.check_at(ip, now() + Duration::from_secs(i)));
        }
        assert!(!limiter.check_at(ip, now() + Duration::from_secs(5)));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = limiter(3600, 1);
        let ip = "1.2.3.4".parse().unwrap();

        assert!(limiter.check_at(ip, now()));
        assert!(!limiter.check_at(ip, now() + Duration::from_secs(3599)));
        assert!(limiter.check_at(ip, now() + Duration::from_secs(3600)));
    }

    #[test]
    fn keys_are_limited_independently() {
        let limiter = limiter(3600, 1);

        assert!(limiter.check_at("1.2.3.4".parse().unwrap(), now()));
        assert!(limiter.check_at("5.6.7.8".parse().unwrap(), now()));
        assert!(!limiter.check_at("1.2.3.4".parse().unwrap(), now()));
    }

    #[test]
    fn expired_windows_are_swept() {
        let limiter = limiter(60, 1);

        for i in 0..SWEEP_THRESHOLD as u32 {
            let ip = IpAddr::from([10, 0, (i >> 8) as u8, i as u8]);
            assert!(limiter.check_at(ip, now()));
        }

        let later = now() + Duration::from_secs(120);
        assert!(limiter.check_at("1.2.3.4".parse().unwrap(), later));

        let windows = limiter.windows.lock().unwrap();
        assert_eq!(windows.len(), 1);
    }
}
