//! # Configuration
//!
//! Environment-driven settings. `main` loads `.env` with dotenvy first, then
//! calls [`Config::from_env`].
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Runtime configuration for the reminder agent
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the reminder server, without trailing slash
    pub base_url: String,
    /// Raw `Cookie` header value for the login-protected endpoints
    pub session_cookie: Option<String>,
    pub poll_interval: Duration,
    /// Last second-of-minute (inclusive) in which a matching reminder may fire
    pub firing_window_end: u32,
    pub dedup_ttl: Duration,
    pub request_timeout: Duration,
    pub desktop_notifications: bool,
    pub sound: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            poll_interval: Duration::from_secs(10),
            firing_window_end: 10,
            dedup_ttl: Duration::from_secs(55),
            request_timeout: Duration::from_secs(8),
            desktop_notifications: true,
            sound: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to [`Config::default`]; set but unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = get("MEDMINDER_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let config = Config {
            base_url,
            session_cookie: get("MEDMINDER_SESSION_COOKIE"),
            poll_interval: parse_secs(get("MEDMINDER_POLL_INTERVAL_SECS"), "MEDMINDER_POLL_INTERVAL_SECS")?
                .unwrap_or(defaults.poll_interval),
            firing_window_end: match get("MEDMINDER_FIRING_WINDOW_SECS") {
                Some(v) => v
                    .parse()
                    .map_err(|_| anyhow!("MEDMINDER_FIRING_WINDOW_SECS must be a number, got '{v}'"))?,
                None => defaults.firing_window_end,
            },
            dedup_ttl: parse_secs(get("MEDMINDER_DEDUP_TTL_SECS"), "MEDMINDER_DEDUP_TTL_SECS")?
                .unwrap_or(defaults.dedup_ttl),
            request_timeout: parse_secs(
                get("MEDMINDER_REQUEST_TIMEOUT_SECS"),
                "MEDMINDER_REQUEST_TIMEOUT_SECS",
            )?
            .unwrap_or(defaults.request_timeout),
            desktop_notifications: parse_flag(
                get("MEDMINDER_DESKTOP_NOTIFICATIONS"),
                "MEDMINDER_DESKTOP_NOTIFICATIONS",
            )?
            .unwrap_or(defaults.desktop_notifications),
            sound: parse_flag(get("MEDMINDER_SOUND"), "MEDMINDER_SOUND")?.unwrap_or(defaults.sound),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that would break the fire-once-per-minute guarantee
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow!(
                "MEDMINDER_BASE_URL must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid MEDMINDER_BASE_URL '{}': {}", self.base_url, e))?;

        if self.poll_interval.is_zero() {
            return Err(anyhow!("Poll interval must be at least 1 second"));
        }

        if self.firing_window_end > 59 {
            return Err(anyhow!(
                "Firing window end must be a second of the minute (0-59), got {}",
                self.firing_window_end
            ));
        }

        // A mark that expires inside the window lets the same minute fire twice
        if self.dedup_ttl.as_secs() <= u64::from(self.firing_window_end) {
            return Err(anyhow!(
                "Dedup TTL ({}s) must be longer than the firing window ({}s)",
                self.dedup_ttl.as_secs(),
                self.firing_window_end
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(anyhow!("Request timeout must be at least 1 second"));
        }

        Ok(())
    }
}

fn parse_secs(value: Option<String>, key: &str) -> Result<Option<Duration>> {
    value
        .map(|v| {
            v.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| anyhow!("{key} must be a whole number of seconds, got '{v}'"))
        })
        .transpose()
}

fn parse_flag(value: Option<String>, key: &str) -> Result<Option<bool>> {
    value
        .map(|v| match v.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "enabled" => Ok(true),
            "0" | "false" | "no" | "off" | "disabled" => Ok(false),
            _ => Err(anyhow!("{key} must be true or false, got '{v}'")),
        })
        .transpose()
}
