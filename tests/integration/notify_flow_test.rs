//! End-to-end tests for POST /listener/notify

mod common;

use std::time::Duration;

use axum::{body::Body, http::Request};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{form_request, spawn_app, spawn_app_with, RecordingMailer};

fn opened_issue() -> Value {
    json!({
        "action": "opened",
        "issue": {
            "user": { "login": "alice" },
            "number": 42,
            "html_url": "http://x/42",
            "title": "Bug"
        },
        "repository": { "name": "r", "full_name": "org/r" }
    })
}

fn notify_request(query: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/listener/notify{}", query))
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn github_with_status(user: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/orgs/acme/members/{}", user)))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_non_member_issue_sends_one_email() {
    let github = github_with_status("alice", 404).await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    let (status, body) = app
        .call(notify_request("?to=a@b.com", &opened_issue()))
        .await;
    assert_eq!(status, 200);
    assert!(body.is_empty());

    let sent = app.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["a@b.com".to_string()]);
    assert!(sent[0].subject.contains("r#42"));
    for expected in ["org/r", "Bug", "alice", "http://x/42"] {
        assert!(sent[0].html_body.contains(expected), "missing {}", expected);
    }
}

#[tokio::test]
async fn test_member_issue_is_ignored() {
    let github = github_with_status("alice", 204).await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    let (status, _) = app
        .call(notify_request("?to=a@b.com", &opened_issue()))
        .await;
    assert_eq!(status, 200);
    assert!(app.sent().is_empty());
}

#[tokio::test]
async fn test_unreachable_github_suppresses_notification() {
    let app = spawn_app("http://127.0.0.1:9", &["acme"]).await;

    let (status, _) = app
        .call(notify_request("?to=a@b.com", &opened_issue()))
        .await;
    assert_eq!(status, 200);
    assert!(app.sent().is_empty());
}

#[tokio::test]
async fn test_missing_recipient_skips_membership_lookup() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&github)
        .await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    let (status, _) = app.call(notify_request("", &opened_issue())).await;
    assert_eq!(status, 200);
    let (status, _) = app.call(notify_request("?to=", &opened_issue())).await;
    assert_eq!(status, 200);

    assert!(app.sent().is_empty());
}

#[tokio::test]
async fn test_closed_issue_is_ignored() {
    let github = github_with_status("alice", 404).await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    let mut payload = opened_issue();
    payload["action"] = json!("closed");

    let (status, _) = app.call(notify_request("?to=a@b.com", &payload)).await;
    assert_eq!(status, 200);
    assert!(app.sent().is_empty());
}

#[tokio::test]
async fn test_invalid_json_still_answers_ok() {
    let github = github_with_status("alice", 404).await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    let request = Request::builder()
        .method("POST")
        .uri("/listener/notify?to=a@b.com")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = app.call(request).await;
    assert_eq!(status, 200);
    assert!(body.is_empty());
    assert!(app.sent().is_empty());
}

#[tokio::test]
async fn test_excluded_reporter_is_ignored() {
    let github = github_with_status("alice", 404).await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    let (status, _) = app
        .call(form_request("POST", "/listener/excludes", "exclude=alice"))
        .await;
    assert_eq!(status, 200);

    app.call(notify_request("?to=a@b.com", &opened_issue())).await;
    assert!(app.sent().is_empty());
}

#[tokio::test]
async fn test_inline_overrides_from_query() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/members/alice"))
        .and(header("authorization", "Basic b3RoZXI6dG9rZW4="))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&github)
        .await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    let query = "?to=a@b.com,%20c@d.org&sender=triage@example.com&githubToken=b3RoZXI6dG9rZW4%3D";
    let (status, _) = app.call(notify_request(query, &opened_issue())).await;
    assert_eq!(status, 200);

    let sent = app.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, "triage@example.com");
    assert_eq!(
        sent[0].to,
        vec!["a@b.com".to_string(), "c@d.org".to_string()]
    );
}

#[tokio::test]
async fn test_unreadable_query_still_answers_ok() {
    let github = github_with_status("alice", 404).await;
    let app = spawn_app(&github.uri(), &["acme"]).await;

    // Repeating a key cannot be mapped onto the query struct
    let (status, body) = app
        .call(notify_request("?to=a@b.com&to=c@d.org", &opened_issue()))
        .await;
    assert_eq!(status, 200);
    assert!(body.is_empty());
    assert!(app.sent().is_empty());
}

#[tokio::test]
async fn test_slow_mail_relay_is_not_cut_short() {
    let github = github_with_status("alice", 404).await;
    let dir = TempDir::new().unwrap();
    let mut config = common::config(&dir, &github.uri(), &["acme"]);
    config.request_timeout = 1;
    let app = spawn_app_with(dir, config, RecordingMailer::slow(Duration::from_secs(2))).await;

    let (status, body) = app
        .call(notify_request("?to=a@b.com", &opened_issue()))
        .await;
    assert_eq!(status, 200);
    assert!(body.is_empty());
    assert_eq!(app.sent().len(), 1);
}

#[tokio::test]
async fn test_slow_membership_lookup_is_not_cut_short() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/members/alice"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_secs(2)))
        .expect(1)
        .mount(&github)
        .await;
    let dir = TempDir::new().unwrap();
    let mut config = common::config(&dir, &github.uri(), &["acme"]);
    config.request_timeout = 1;
    let app = spawn_app_with(dir, config, RecordingMailer::default()).await;

    let (status, _) = app
        .call(notify_request("?to=a@b.com", &opened_issue()))
        .await;
    assert_eq!(status, 200);
    assert_eq!(app.sent().len(), 1);
}
