//! Per-client rate limiting backed by `governor` keyed token buckets.

use std::net::SocketAddr;
use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use edugroup_config::KeyedLimiter;
use edugroup_core::AppError;

use crate::metrics::track_rate_limited;

/// Shared limiter plus the label used in logs and metrics.
#[derive(Clone)]
pub struct RateLimitLayerState {
    pub limiter: Arc<KeyedLimiter>,
    pub scope: &'static str,
    pub trust_forwarded_for: bool,
}

impl RateLimitLayerState {
    pub fn new(limiter: KeyedLimiter, scope: &'static str, trust_forwarded_for: bool) -> Self {
        Self {
            limiter: Arc::new(limiter),
            scope,
            trust_forwarded_for,
        }
    }

    /// Periodically evicts buckets that have refilled. The task ends once the
    /// limiter is dropped.
    pub fn spawn_cleanup(&self, every: Duration) {
        let limiter: Weak<KeyedLimiter> = Arc::downgrade(&self.limiter);
        let scope = self.scope;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                limiter.retain_recent();
                limiter.shrink_to_fit();
                tracing::debug!(scope, tracked_clients = limiter.len(), "Rate limiter swept");
            }
        });
    }
}

/// Client key: the TCP peer address. Behind a trusted proxy, the last
/// `X-Forwarded-For` hop (the one the proxy appended) is used instead.
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    let forwarded = trust_forwarded_for
        .then(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.rsplit(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .flatten();

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(layer): State<RateLimitLayerState>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let key = client_key(req.headers(), peer, layer.trust_forwarded_for);

    if layer.limiter.check_key(&key).is_err() {
        tracing::warn!(client = %key, scope = layer.scope, "Rate limit exceeded");
        track_rate_limited(layer.scope);
        return AppError::too_many_requests("Too many requests, please try again later")
            .into_response();
    }

    next.run(req).await
}
