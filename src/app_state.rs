//! Application state shared across all handlers.

use crate::config::Config;
use crate::services::{ExclusionList, NotificationDispatcher};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Eligibility pipeline and mail delivery
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    pub fn exclusions(&self) -> &ExclusionList {
        self.dispatcher.exclusions()
    }
}

impl axum::extract::FromRef<AppState> for NotificationDispatcher {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dispatcher.clone()
    }
}

impl axum::extract::FromRef<AppState> for ExclusionList {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dispatcher.exclusions().clone()
    }
}
