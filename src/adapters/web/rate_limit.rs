//! Token-bucket admission control for the web adapter.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use super::error::ErrorBody;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Process-wide token bucket. A rejected request is answered before the
/// validator or engine run.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<DirectRateLimiter>,
}

impl RateLimit {
    pub fn new(per_second: u32, burst: u32) -> Self {
        let per_second =
            NonZeroU32::new(per_second.max(1)).expect("clamped rate must be non-zero");
        let burst = NonZeroU32::new(burst.max(1)).expect("clamped burst must be non-zero");

        let quota = Quota::per_second(per_second).allow_burst(burst);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn allow(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

pub async fn admission(
    State(limit): State<RateLimit>,
    request: Request,
    next: Next,
) -> Response {
    if !limit.allow() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorBody {
                message: "The API is at capacity, try again later.".into(),
            }),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_burst_then_rejects() {
        let limit = RateLimit::new(1, 2);
        assert!(limit.allow());
        assert!(limit.allow());
        assert!(!limit.allow());
    }

    #[test]
    fn zero_configuration_is_clamped_to_one() {
        let limit = RateLimit::new(0, 0);
        assert!(limit.allow());
        assert!(!limit.allow());
    }
}
