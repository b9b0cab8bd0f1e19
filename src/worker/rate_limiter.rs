//! Optional request-rate limiting

use std::num::NonZeroU32;

use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};

/// Token-bucket request rate limiter (governor crate)
///
/// One instance per worker, so the configured RPS is a per-worker cap.
/// A run with no `rate_limit` configured carries a disabled limiter and
/// [`RequestRateLimiter::wait`] returns immediately.
pub struct RequestRateLimiter {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    rate_limit: Option<f64>,
}

impl RequestRateLimiter {
    /// Create a limiter for the given requests-per-second cap.
    ///
    /// `None`, zero, or negative values disable limiting. Fractional rates
    /// are rounded up to the next whole RPS.
    pub fn new(rate_limit: Option<f64>) -> Self {
        let limiter = rate_limit.and_then(|rps| {
            if rps <= 0.0 {
                return None;
            }
            let quota = Quota::per_second(NonZeroU32::new((rps.ceil() as u32).max(1))?);
            Some(RateLimiter::direct(quota))
        });

        Self { limiter, rate_limit }
    }

    /// Wait until the next request is allowed.
    pub async fn wait(&self) {
        if let Some(ref limiter) = self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Whether rate limiting is active
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// The configured cap, if any
    pub fn rate_limit(&self) -> Option<f64> {
        self.rate_limit
    }
}

impl std::fmt::Debug for RequestRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRateLimiter")
            .field("rate_limit", &self.rate_limit)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
