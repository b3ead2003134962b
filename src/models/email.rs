/// An HTML email ready to be handed to a mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    /// Build a message for a recipient string such as `"a@x.org, b@x.org"`.
    ///
    /// All whitespace is removed before splitting on commas.
    pub fn new(
        from: impl Into<String>,
        recipients: &str,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: parse_recipients(recipients),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

pub fn parse_recipients(raw: &str) -> Vec<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact.split(',').map(str::to_string).collect()
}
