//! Application startup and initialization logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::app_state::AppState;
use crate::config::Config;
use crate::services;

/// Initialize application services and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!("🚀 Starting issue notifier");

    // Load exclusion list (missing or unreadable file starts empty)
    let exclusions = services::ExclusionList::load(services::PropertiesStore::new(
        config.exclusions.file_path.clone(),
    ))
    .await;

    // Initialize membership checker
    let membership = services::GithubMembershipChecker::new(
        &config.github,
        Duration::from_secs(config.request_timeout),
    )
    .context("Failed to build GitHub HTTP client")?;
    if membership.orgs().is_empty() {
        warn!("GITHUB_ORGS is empty: every reporter will be treated as a non-member");
    }
    if config.github.token.is_empty() {
        warn!("GITHUB_TOKEN is not set: private organization memberships cannot be seen");
    }

    // Initialize email service
    let email_service = services::EmailService::new(&config.email)
        .context("Failed to initialize email service")?;
    if !email_service.is_enabled() {
        warn!("EMAIL_ENABLED=false: notifications will be logged but not sent");
    }

    let dispatcher = services::NotificationDispatcher::new(
        exclusions,
        Arc::new(membership),
        Arc::new(email_service),
        config.email.from_address.clone(),
    );
    info!("✅ Notification dispatcher initialized");

    Ok(AppState {
        config: config.clone(),
        dispatcher,
    })
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
