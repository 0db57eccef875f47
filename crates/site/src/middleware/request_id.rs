//! Per-request correlation id.
//!
//! Every response carries an `x-request-id` header. A proxy in front of
//! the site may mint the id; otherwise one is generated here. The same id
//! lands in the request's tracing span and on the Sentry scope, so a
//! support ticket quoting the header finds both the logs and the event.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Adopt the upstream `x-request-id` or mint a UUID v4, then echo it.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let upstream = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let request_id = upstream.unwrap_or_else(|| Uuid::new_v4().to_string());

    // The span itself is opened by the trace layer; see make_request_span
    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;

    if let Ok(echo) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, echo);
    }

    response
}
