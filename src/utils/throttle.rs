use crate::core::classifier::RawResponse;
use crate::core::descriptor::Descriptor;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{HttpRequest, RestClient};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spacing used when a descriptor declares no `rateLimit`
const FALLBACK_INTERVAL: Duration = Duration::from_secs(1);

/// Transport wrapper that waits for a token before every request.
///
/// Clones share one bucket, so every component of a connector draws from
/// the same budget.
#[derive(Clone)]
pub struct Throttled<R> {
    inner: R,
    limiter: Arc<DirectRateLimiter>,
}

impl<R> Throttled<R> {
    /// One request per `interval`, without bursts
    pub fn new(inner: R, interval: Duration) -> Self {
        let quota = Quota::with_period(interval)
            .unwrap_or_else(|| Quota::per_second(nonzero!(1u32)))
            .allow_burst(nonzero!(1u32));
        Self {
            inner,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Interval taken from the descriptor's `rateLimit` (milliseconds)
    pub fn from_descriptor(inner: R, descriptor: &Descriptor) -> Self {
        let interval = descriptor
            .rate_limit()
            .filter(|ms| *ms > 0)
            .map_or(FALLBACK_INTERVAL, Duration::from_millis);
        Self::new(inner, interval)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: RestClient> RestClient for Throttled<R> {
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, ExchangeError> {
        self.limiter.until_ready().await;
        trace!(url = %request.url, "rate limit token acquired");
        self.inner.execute(request).await
    }
}
