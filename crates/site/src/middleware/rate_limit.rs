//! Per-IP rate limiting with governor and `tower_governor`.
//!
//! Two limiters cover the abusable endpoints: the live search fragment
//! (read traffic, generous burst) and the mutations (favorite toggles and
//! the cache refresh hook). Full page loads are not limited.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers that may carry the real client address, most trusted
/// first. Cloudflare and Fly.io each set their own.
const CLIENT_IP_HEADERS: &[&str] = &[
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "fly-client-ip",
];

/// Keys requests by client IP: proxy headers when present, the socket
/// peer address otherwise.
///
/// The peer fallback requires serving the router with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Clone, Copy)]
pub struct ProxyIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ProxyIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let from_headers = CLIENT_IP_HEADERS
            .iter()
            .find_map(|name| header_ip(req, name));
        if let Some(ip) = from_headers {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|peer| peer.0.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Parse one proxy header as an address. `X-Forwarded-For` may hold a
/// comma-separated chain; the first entry is the client.
fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
    let raw = req.headers().get(name)?.to_str().ok()?;
    raw.split(',').next()?.trim().parse().ok()
}

/// Rate limiter layer type for Axum, keyed by [`ProxyIpKeyExtractor`].
pub type RateLimiterLayer =
    GovernorLayer<ProxyIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn ip_limiter(per_second: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ProxyIpKeyExtractor)
        .per_second(per_second)
        .burst_size(burst)
        .finish()
        .expect("nonzero per_second and burst_size always build");
    GovernorLayer::new(Arc::new(config))
}

/// Limiter for `/search/suggest`: replenish 1/s, burst 20.
///
/// The search box debounces on the client, but fast typists still land a
/// dozen requests in a few seconds; the burst absorbs that.
#[must_use]
pub fn suggest_rate_limiter() -> RateLimiterLayer {
    ip_limiter(1, 20)
}

/// Limiter for favorite toggles and `/internal/refresh`: replenish 1/s,
/// burst 15.
#[must_use]
pub fn mutation_rate_limiter() -> RateLimiterLayer {
    ip_limiter(1, 15)
}
