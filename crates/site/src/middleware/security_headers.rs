//! Response security headers.
//!
//! One fixed header set for every page response. The site serves no inline
//! scripts and no third-party scripts, so the CSP can stay at
//! `default-src 'none'` with narrow carve-outs; the only cross-origin
//! resources are dish photos in Supabase storage.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// `img-src` admits Supabase storage; everything else is same-origin
/// (htmx is vendored under `/static`).
const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' data: https://*.supabase.co; \
     connect-src 'self'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'; \
     upgrade-insecure-requests";

/// Deny every sensitive browser feature; a menu site needs none of them.
const PERMISSIONS_POLICY: &str = "accelerometer=(), \
     ambient-light-sensor=(), \
     autoplay=(), \
     battery=(), \
     browsing-topics=(), \
     camera=(), \
     cross-origin-isolated=(), \
     display-capture=(), \
     document-domain=(), \
     encrypted-media=(), \
     execution-while-not-rendered=(), \
     execution-while-out-of-viewport=(), \
     fullscreen=(), \
     geolocation=(), \
     gyroscope=(), \
     hid=(), \
     idle-detection=(), \
     interest-cohort=(), \
     magnetometer=(), \
     microphone=(), \
     midi=(), \
     navigation-override=(), \
     payment=(), \
     picture-in-picture=(), \
     publickey-credentials-get=(), \
     screen-wake-lock=(), \
     serial=(), \
     sync-xhr=(), \
     usb=(), \
     web-share=(), \
     xr-spatial-tracking=()";

/// Headers and their fixed values, applied to every routed response.
///
/// Notes on the less common picks:
/// - `Cache-Control: no-store`: every page renders the per-session
///   favorites badge, so no response is shareable between visitors.
///   Fingerprinted assets under `/static` sit outside this middleware.
/// - `Cross-Origin-Embedder-Policy: credentialless` rather than
///   `require-corp`: Supabase storage sends no CORP header, and
///   `require-corp` would block every menu photo.
static RESPONSE_HEADERS: &[(HeaderName, &str)] = &[
    (HeaderName::from_static("x-frame-options"), "DENY"),
    (HeaderName::from_static("x-content-type-options"), "nosniff"),
    (HeaderName::from_static("referrer-policy"), "no-referrer"),
    (
        HeaderName::from_static("content-security-policy"),
        CONTENT_SECURITY_POLICY,
    ),
    (
        HeaderName::from_static("permissions-policy"),
        PERMISSIONS_POLICY,
    ),
    (
        HeaderName::from_static("cache-control"),
        "no-store, max-age=0",
    ),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("cross-origin-resource-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("cross-origin-embedder-policy"),
        "credentialless",
    ),
    (HeaderName::from_static("x-dns-prefetch-control"), "off"),
];

/// Apply [`RESPONSE_HEADERS`] to the response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    for (name, value) in RESPONSE_HEADERS {
        headers.insert(name.clone(), HeaderValue::from_static(value));
    }

    response
}
