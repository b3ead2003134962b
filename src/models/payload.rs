//! GitHub issue webhook payloads.
//!
//! Payloads are kept as untyped JSON. Only a handful of dotted paths are ever
//! read, and a path that cannot be resolved reads as an empty string.

use serde_json::Value;

pub const ACTION_KEY: &str = "action";
pub const ISSUE_REPORTER_KEY: &str = "issue.user.login";
pub const ISSUE_NUMBER_KEY: &str = "issue.number";
pub const ISSUE_URL_KEY: &str = "issue.html_url";
pub const ISSUE_TITLE_KEY: &str = "issue.title";
pub const REPOSITORY_NAME_KEY: &str = "repository.name";
pub const REPOSITORY_FULL_NAME_KEY: &str = "repository.full_name";

/// Action value that marks a newly opened issue
pub const OPENED_ACTION: &str = "opened";

/// Resolve `path` (e.g. `issue.user.login`) against `payload`.
///
/// Strings are returned verbatim, numbers and booleans in their JSON text
/// form. Missing keys, non-object intermediates, `null`, and object or array
/// leaves all yield `""`.
pub fn extract_field(payload: &Value, path: &str) -> String {
    let leaf = path
        .split('.')
        .try_fold(payload, |node, key| node.as_object()?.get(key));

    match leaf {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// The fields of an issue event that the notifier cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueEvent {
    pub action: String,
    pub reporter: String,
    pub number: String,
    pub url: String,
    pub title: String,
    pub repository_name: String,
    pub repository_full_name: String,
}

impl IssueEvent {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            action: extract_field(payload, ACTION_KEY),
            reporter: extract_field(payload, ISSUE_REPORTER_KEY),
            number: extract_field(payload, ISSUE_NUMBER_KEY),
            url: extract_field(payload, ISSUE_URL_KEY),
            title: extract_field(payload, ISSUE_TITLE_KEY),
            repository_name: extract_field(payload, REPOSITORY_NAME_KEY),
            repository_full_name: extract_field(payload, REPOSITORY_FULL_NAME_KEY),
        }
    }

    pub fn is_opened(&self) -> bool {
        self.action == OPENED_ACTION
    }
}
