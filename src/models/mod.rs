// Data models: inbound webhook payloads and outbound email messages

pub mod email;
pub mod payload;

pub use email::EmailMessage;
pub use payload::{extract_field, IssueEvent};
