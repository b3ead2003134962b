//! Notification Dispatcher Service
//!
//! Decides whether an issue event came from an outside contributor and, if
//! so, emails the recipients supplied with the webhook call.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::models::{EmailMessage, IssueEvent};
use crate::services::email::{templates::EmailTemplates, MailSender};
use crate::services::exclusion_list::ExclusionList;
use crate::services::membership::MembershipChecker;

/// Per-request inputs that accompany a webhook payload
#[derive(Debug, Clone, Default)]
pub struct NotifyRequest {
    /// Comma-separated recipient addresses
    pub to: Option<String>,
    /// Overrides the configured sender address
    pub sender: Option<String>,
    /// Overrides the configured membership credential
    pub github_token: Option<String>,
}

/// Outcome of the eligibility pipeline, naming the first rule that declined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Notify,
    NoRecipient,
    NotOpened,
    Excluded,
    Member,
}

impl Eligibility {
    pub fn should_notify(&self) -> bool {
        matches!(self, Eligibility::Notify)
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    exclusions: ExclusionList,
    membership: Arc<dyn MembershipChecker>,
    mailer: Arc<dyn MailSender>,
    default_sender: String,
}

impl NotificationDispatcher {
    pub fn new(
        exclusions: ExclusionList,
        membership: Arc<dyn MembershipChecker>,
        mailer: Arc<dyn MailSender>,
        default_sender: impl Into<String>,
    ) -> Self {
        Self {
            exclusions,
            membership,
            mailer,
            default_sender: default_sender.into(),
        }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    /// Run the eligibility rules in order, stopping at the first that declines.
    pub async fn check_eligibility(&self, event: &IssueEvent, request: &NotifyRequest) -> Eligibility {
        if request.to.as_deref().map_or(true, str::is_empty) {
            return Eligibility::NoRecipient;
        }

        if !event.is_opened() {
            return Eligibility::NotOpened;
        }

        if self.exclusions.contains(&event.reporter).await {
            return Eligibility::Excluded;
        }

        if self
            .membership
            .is_member(&event.reporter, request.github_token.as_deref())
            .await
        {
            return Eligibility::Member;
        }

        Eligibility::Notify
    }

    /// Handle one webhook delivery. Delivery failures are logged, never returned.
    pub async fn dispatch(&self, payload: &Value, request: &NotifyRequest) -> Eligibility {
        let event = IssueEvent::from_payload(payload);
        let eligibility = self.check_eligibility(&event, request).await;

        if !eligibility.should_notify() {
            debug!(
                reporter = %event.reporter,
                action = %event.action,
                decision = ?eligibility,
                "Skipping notification"
            );
            return eligibility;
        }

        let recipients = request.to.as_deref().unwrap_or_default();
        let sender = request
            .sender
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_sender.as_str());

        let message = EmailMessage::new(
            sender,
            recipients,
            EmailTemplates::issue_subject(&event),
            EmailTemplates::issue_email(&event),
        );

        // Best effort: the outcome is only logged
        match self.mailer.send(&message).await {
            Ok(()) => info!(
                reporter = %event.reporter,
                repository = %event.repository_full_name,
                issue = %event.number,
                "Sent non-member issue notification"
            ),
            Err(e) => error!(
                reporter = %event.reporter,
                repository = %event.repository_full_name,
                issue = %event.number,
                "Failed to send issue notification: {:#}",
                e
            ),
        }

        eligibility
    }
}
