//! Rate limiting configuration for API endpoints.
//!
//! Quotas are enforced with the Governor crate using one token bucket per
//! client IP address. The address is the TCP peer unless the server is told
//! it sits behind a trusted reverse proxy.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: Requests per second for general endpoints (default: 20)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Burst size for general endpoints (default: 60)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Requests per second for auth endpoints (default: 2)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Burst size for auth endpoints (default: 10)
//! - `RATE_LIMIT_TRUST_FORWARDED_FOR`: Key on the `X-Forwarded-For` hop added by
//!   the proxy instead of the peer address (default: false)
//! - `RATE_LIMIT_CLEANUP_SECS`: How often idle buckets are evicted (default: 60)
//!
//! # Strategy
//!
//! - Tokens are added at the configured rate (per second)
//! - Each request consumes one token
//! - Burst size is the maximum number of tokens that can accumulate
//! - Requests are rejected when the bucket is empty

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

/// A limiter keyed by client address.
pub type KeyedLimiter = DefaultKeyedRateLimiter<String>;

/// Rate limit configuration for the API.
///
/// Authentication endpoints get their own, stricter bucket so password
/// guessing cannot borrow from the general allowance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per second for general endpoints.
    pub general_per_second: u32,

    /// Burst size for general endpoints.
    pub general_burst_size: u32,

    /// Requests per second for auth endpoints.
    pub auth_per_second: u32,

    /// Burst size for auth endpoints.
    pub auth_burst_size: u32,

    /// Only enable when every request reaches the server through a proxy
    /// that appends the client address to `X-Forwarded-For`.
    pub trust_forwarded_for: bool,

    /// Interval between sweeps that drop buckets which have fully refilled.
    pub cleanup_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 20,
            general_burst_size: 60,
            auth_per_second: 2,
            auth_burst_size: 10,
            trust_forwarded_for: false,
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Falls back to default values if a variable is not set or cannot be parsed.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            general_per_second: env_u32("RATE_LIMIT_GENERAL_PER_SECOND")
                .unwrap_or(defaults.general_per_second),
            general_burst_size: env_u32("RATE_LIMIT_GENERAL_BURST_SIZE")
                .unwrap_or(defaults.general_burst_size),
            auth_per_second: env_u32("RATE_LIMIT_AUTH_PER_SECOND")
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: env_u32("RATE_LIMIT_AUTH_BURST_SIZE")
                .unwrap_or(defaults.auth_burst_size),
            trust_forwarded_for: std::env::var("RATE_LIMIT_TRUST_FORWARDED_FOR")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.trust_forwarded_for),
            cleanup_interval: env_u32("RATE_LIMIT_CLEANUP_SECS")
                .filter(|secs| *secs > 0)
                .map(|secs| Duration::from_secs(u64::from(secs)))
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Builds the limiter applied to every `/api` route.
    #[must_use]
    pub fn general_limiter(&self) -> KeyedLimiter {
        RateLimiter::keyed(quota(self.general_per_second, self.general_burst_size))
    }

    /// Builds the stricter limiter applied to `/api/auth` routes.
    #[must_use]
    pub fn auth_limiter(&self) -> KeyedLimiter {
        RateLimiter::keyed(quota(self.auth_per_second, self.auth_burst_size))
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Zero is not a valid quota; it is clamped to one.
fn quota(per_second: u32, burst_size: u32) -> Quota {
    let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(rate).allow_burst(burst)
}
