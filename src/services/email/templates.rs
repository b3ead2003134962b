//! Email templates for issue notifications

use crate::models::IssueEvent;

pub struct EmailTemplates;

impl EmailTemplates {
    /// Subject line, e.g. `[Git-Issue] New issue docs#42 from non member`
    pub fn issue_subject(event: &IssueEvent) -> String {
        format!(
            "[Git-Issue] New issue {}#{} from non member",
            event.repository_name, event.number
        )
    }

    /// HTML body listing repository, title, reporter and link
    pub fn issue_email(event: &IssueEvent) -> String {
        format!(
            r#"<html>
<body>
  <div><code>Repository: {}</code></div>
  <div><code>Issue: {}</code></div>
  <div><code>Reporter: {}</code></div>
  <div><code>Link: <a href="{}">{}</a></code></div>
</body>
</html>"#,
            html_escape(&event.repository_full_name),
            html_escape(&event.title),
            html_escape(&event.reporter),
            html_escape(&event.url),
            html_escape(&event.url),
        )
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
