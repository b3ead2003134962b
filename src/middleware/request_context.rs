//! Per-request tracing context.
//!
//! Every request runs inside a `request` span carrying a request id. For
//! webhook deliveries the id is GitHub's `X-GitHub-Delivery` GUID, so log
//! lines can be matched against the delivery log in the repository settings.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
pub const GITHUB_DELIVERY_HEADER: &str = "X-GitHub-Delivery";
pub const GITHUB_EVENT_HEADER: &str = "X-GitHub-Event";

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let delivery = header_value(&request, GITHUB_DELIVERY_HEADER);
    let event = header_value(&request, GITHUB_EVENT_HEADER);
    let request_id = delivery
        .clone()
        .or_else(|| header_value(&request, REQUEST_ID_HEADER))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        github_event = event.as_deref().unwrap_or("-"),
    );
    let start = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    if let Some(delivery) = &delivery {
        let status = response.status();
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if status.is_success() {
            info!(parent: &span, delivery = %delivery, elapsed_ms, "Webhook delivery handled");
        } else {
            warn!(parent: &span, delivery = %delivery, status = %status, elapsed_ms, "Webhook delivery rejected");
        }
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
