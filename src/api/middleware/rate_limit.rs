//! Rate limiting middleware using token bucket algorithm.
//!
//! Each limiter comes in two flavours: keyed by the socket peer address, or,
//! for deployments behind a trusted reverse proxy, by the client address
//! from `X-Forwarded-For` / `X-Real-IP` / `Forwarded`.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

pub type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build<K: KeyExtractor>(key: K, per_second: u64, burst: u32) -> RateLimitLayer<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key)
            .per_second(per_second)
            .burst_size(burst)
            .finish()
            .expect("rate limit period and burst are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a rate limiter for public endpoints (redirects, health).
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer() -> RateLimitLayer<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, 2, 100)
}

/// Proxy-aware variant of [`layer`].
pub fn proxied_layer() -> RateLimitLayer<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, 2, 100)
}

/// Creates a stricter rate limiter for the auth and URL management API.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer() -> RateLimitLayer<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, 1, 10)
}

/// Proxy-aware variant of [`secure_layer`].
pub fn proxied_secure_layer() -> RateLimitLayer<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, 1, 10)
}
