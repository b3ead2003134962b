//! Tests for the /listener/excludes resource

mod common;

use axum::{body::Body, http::Request};
use tempfile::TempDir;

use common::{form_request, spawn_app, spawn_app_in};

fn list_request() -> Request<Body> {
    Request::builder()
        .uri("/listener/excludes")
        .body(Body::empty())
        .unwrap()
}

fn ids(body: &str) -> Vec<String> {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_list_starts_empty() {
    let app = spawn_app("http://127.0.0.1:9", &[]).await;

    let (status, body) = app.call(list_request()).await;
    assert_eq!(status, 200);
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_add_returns_current_list_and_is_idempotent() {
    let app = spawn_app("http://127.0.0.1:9", &[]).await;

    let (status, body) = app
        .call(form_request("POST", "/listener/excludes", "exclude=alice%2C+bob"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), vec!["alice", "bob"]);

    let (_, body) = app
        .call(form_request("POST", "/listener/excludes", "exclude=alice"))
        .await;
    assert_eq!(ids(&body), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_delete_returns_empty_body_and_ignores_unknown_ids() {
    let app = spawn_app("http://127.0.0.1:9", &[]).await;
    app.call(form_request("POST", "/listener/excludes", "exclude=alice,bob"))
        .await;

    let (status, body) = app
        .call(form_request("DELETE", "/listener/excludes", "exclude=bob,carol"))
        .await;
    assert_eq!(status, 200);
    assert!(body.is_empty());

    let (_, body) = app.call(list_request()).await;
    assert_eq!(ids(&body), vec!["alice"]);
}

#[tokio::test]
async fn test_missing_form_field_is_bad_request() {
    let app = spawn_app("http://127.0.0.1:9", &[]).await;

    let (status, body) = app
        .call(form_request("POST", "/listener/excludes", "other=1"))
        .await;
    assert_eq!(status, 400);

    let error: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"]["code"], "VAL_3002");
    assert_eq!(error["error"]["field"], "exclude");
}

#[tokio::test]
async fn test_list_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_path_buf();

    let app = spawn_app_in(dir, "http://127.0.0.1:9", &[]).await;
    app.call(form_request("POST", "/listener/excludes", "exclude=alice,bob,carol"))
        .await;
    app.call(form_request("DELETE", "/listener/excludes", "exclude=bob"))
        .await;
    assert!(app.excludes_file().exists());

    // Keep the directory alive while a second app loads the same file
    let common::TestApp { dir, .. } = app;
    assert_eq!(dir.path(), path.as_path());

    let restarted = spawn_app_in(dir, "http://127.0.0.1:9", &[]).await;
    let (_, body) = restarted.call(list_request()).await;
    let mut listed = ids(&body);
    listed.sort();
    assert_eq!(listed, vec!["alice", "carol"]);
}

#[tokio::test]
async fn test_ids_with_separators_survive_restart() {
    let app = spawn_app("http://127.0.0.1:9", &[]).await;

    // alice, "bob\nexcludes=mallory" and "carol:admin"
    let (status, body) = app
        .call(form_request(
            "POST",
            "/listener/excludes",
            "exclude=alice,bob%0Aexcludes%3Dmallory,carol%3Aadmin",
        ))
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), vec!["alice", "bob\nexcludes=mallory", "carol:admin"]);

    let text = std::fs::read_to_string(app.excludes_file()).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("excludes")).count(), 1);

    let common::TestApp { dir, .. } = app;
    let restarted = spawn_app_in(dir, "http://127.0.0.1:9", &[]).await;
    let (_, body) = restarted.call(list_request()).await;
    assert_eq!(ids(&body), vec!["alice", "bob\nexcludes=mallory", "carol:admin"]);
}
