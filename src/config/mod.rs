use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Seconds; applied to the server timeout layer and outbound HTTP calls
    pub request_timeout: u64,
    pub log_format: String,
    pub github: GithubConfig,
    pub email: EmailConfig,
    pub exclusions: ExclusionConfig,
}

/// Membership lookups against the GitHub REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    pub api_url: String,
    /// base64(`username:personal_token`), sent as HTTP Basic credentials
    #[serde(skip_serializing)]
    pub token: String,
    /// Organizations whose members are treated as insiders, checked in order
    pub orgs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    #[serde(skip_serializing)]
    pub smtp_password: String,
    pub from_address: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionConfig {
    pub file_path: PathBuf,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@localhost".to_string(),
            enabled: true,
        }
    }
}

impl Config {
    /// Read configuration from the process environment. `.env` loading is
    /// left to the binary.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8080)?,
            request_timeout: parse_var("REQUEST_TIMEOUT", 30)?,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            github: GithubConfig {
                api_url: env::var("GITHUB_API_URL")
                    .unwrap_or_else(|_| "https://api.github.com".to_string()),
                token: env::var("GITHUB_TOKEN").unwrap_or_default(),
                orgs: split_list(&env::var("GITHUB_ORGS").unwrap_or_default()),
            },
            email: EmailConfig {
                smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                smtp_port: parse_var("SMTP_PORT", 587)?,
                smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
                smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_address: env::var("EMAIL_FROM_ADDRESS")
                    .unwrap_or_else(|_| "noreply@localhost".to_string()),
                enabled: parse_var("EMAIL_ENABLED", true)?,
            },
            exclusions: ExclusionConfig {
                file_path: env::var("EXCLUDES_FILE")
                    .unwrap_or_else(|_| "notifier.properties".to_string())
                    .into(),
            },
        })
    }
}

/// Read an optional variable, falling back to `default` when unset.
/// A value that is set but malformed is a startup error.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
