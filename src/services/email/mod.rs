pub mod templates;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info, warn};

use crate::config::EmailConfig;
use crate::models::EmailMessage;

/// Outbound mail transport
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// SMTP mail sender
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    enabled: bool,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> Result<Self> {
        // Port 1025 is typically used for MailHog/local testing (no TLS)
        let use_tls = config.smtp_port != 1025;

        let mailer = if use_tls {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .context("Failed to create SMTP transport with TLS")?
                .port(config.smtp_port);

            if !config.smtp_username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ));
            }
            builder.build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        };

        info!(
            "Email service initialized: {}:{} (TLS: {}, enabled: {})",
            config.smtp_host, config.smtp_port, use_tls, config.enabled
        );

        Ok(Self {
            mailer,
            enabled: config.enabled,
        })
    }

    /// Check if email service is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn build_message(message: &EmailMessage) -> Result<Message> {
        let from: Mailbox = message
            .from
            .parse()
            .with_context(|| format!("Failed to parse from address {:?}", message.from))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_HTML);

        let mut accepted = 0;
        for recipient in &message.to {
            match recipient.parse::<Mailbox>() {
                Ok(mailbox) => {
                    builder = builder.to(mailbox);
                    accepted += 1;
                }
                Err(e) => warn!("Skipping invalid recipient {:?}: {}", recipient, e),
            }
        }

        if accepted == 0 {
            anyhow::bail!("No valid recipients in {:?}", message.to);
        }

        builder
            .body(message.html_body.clone())
            .context("Failed to build email message")
    }
}

#[async_trait]
impl MailSender for EmailService {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if !self.enabled {
            info!(
                "Email service disabled, skipping notification to {:?}",
                message.to
            );
            return Ok(());
        }

        let email = Self::build_message(message)?;

        match self.mailer.send(email).await {
            Ok(response) => {
                info!(
                    code = %response.code(),
                    "Notification email accepted for {:?}: {}",
                    message.to,
                    message.subject
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to send email to {:?}: {}", message.to, e);
                Err(anyhow::anyhow!("Failed to send email: {}", e))
            }
        }
    }
}
