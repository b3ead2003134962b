//! Webhook entry point
//!
//! Always answers `200 OK` with an empty body; the decision and any delivery
//! failure only show up in the logs.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn, Instrument, Span};
use utoipa::IntoParams;

use crate::services::{NotificationDispatcher, NotifyRequest};

/// Query parameters accepted by the webhook
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotifyQuery {
    /// Comma-separated recipient addresses
    pub to: Option<String>,
    /// Sender address for this notification
    pub sender: Option<String>,
    /// base64(`user:token`) credential for membership lookups
    #[serde(rename = "githubToken")]
    pub github_token: Option<String>,
}

impl From<NotifyQuery> for NotifyRequest {
    fn from(query: NotifyQuery) -> Self {
        NotifyRequest {
            to: query.to,
            sender: query.sender,
            github_token: query.github_token,
        }
    }
}

/// Receive a GitHub issue webhook
/// POST /listener/notify
#[utoipa::path(
    post,
    path = "/listener/notify",
    tag = "listener",
    params(NotifyQuery),
    request_body(
        content = String,
        content_type = "application/json",
        description = "GitHub `issues` event payload"
    ),
    responses(
        (status = 200, description = "Payload accepted")
    )
)]
pub async fn notify(
    State(dispatcher): State<NotificationDispatcher>,
    query: Result<Query<NotifyQuery>, QueryRejection>,
    body: Bytes,
) -> StatusCode {
    // A query that cannot be read carries no recipients, so nothing is sent
    let query = query.map(|Query(q)| q).unwrap_or_else(|e| {
        warn!("Webhook query string rejected: {}", e.body_text());
        NotifyQuery::default()
    });

    // Unparseable bodies resolve every field to "" and are ignored downstream
    let payload = serde_json::from_slice::<Value>(&body).unwrap_or_else(|e| {
        warn!("Webhook body is not valid JSON: {}", e);
        Value::Null
    });

    let request = NotifyRequest::from(query);

    // Runs to completion even if the caller hangs up
    let delivery = tokio::spawn(
        async move { dispatcher.dispatch(&payload, &request).await }.instrument(Span::current()),
    );
    if let Err(e) = delivery.await {
        error!("Notification task failed: {}", e);
    }

    StatusCode::OK
}
