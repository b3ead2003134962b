//! Organization membership lookups.
//!
//! A reporter counts as an insider when any configured GitHub organization
//! confirms membership. Transport failures also count as membership so that
//! an unreachable API suppresses notifications instead of spamming them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use tracing::{debug, error, info};

use crate::config::GithubConfig;

#[async_trait]
pub trait MembershipChecker: Send + Sync {
    /// Returns `true` when `user` belongs to any configured group, or when
    /// membership could not be determined because a lookup failed in transit.
    ///
    /// `credential` overrides the configured credential for this lookup.
    async fn is_member(&self, user: &str, credential: Option<&str>) -> bool;
}

/// Checks membership through `GET /orgs/{org}/members/{user}`
#[derive(Clone)]
pub struct GithubMembershipChecker {
    client: Client,
    api_url: String,
    token: String,
    orgs: Vec<String>,
}

impl GithubMembershipChecker {
    pub fn new(config: &GithubConfig, timeout: Duration) -> anyhow::Result<Self> {
        // GitHub answers 302 for requesters outside the org; that must not be followed
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .user_agent(concat!("issue-notifier/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(
            "Membership checker initialized: {} (orgs: {:?})",
            config.api_url, config.orgs
        );

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            orgs: config.orgs.clone(),
        })
    }

    pub fn orgs(&self) -> &[String] {
        &self.orgs
    }
}

#[async_trait]
impl MembershipChecker for GithubMembershipChecker {
    async fn is_member(&self, user: &str, credential: Option<&str>) -> bool {
        let token = credential.unwrap_or(&self.token);

        for org in &self.orgs {
            let url = format!("{}/orgs/{}/members/{}", self.api_url, org, user);

            let mut request = self.client.get(&url);
            if !token.is_empty() {
                request = request.header(reqwest::header::AUTHORIZATION, format!("Basic {}", token));
            }

            match request.send().await {
                Ok(response) if response.status() == StatusCode::NO_CONTENT => {
                    debug!(user = %user, org = %org, "Reporter is an organization member");
                    return true;
                }
                Ok(response) => {
                    debug!(
                        user = %user,
                        org = %org,
                        status = %response.status(),
                        "Reporter is not an organization member"
                    );
                }
                Err(e) => {
                    error!(
                        user = %user,
                        org = %org,
                        "Membership lookup failed, treating reporter as member: {}",
                        e
                    );
                    return true;
                }
            }
        }

        false
    }
}
