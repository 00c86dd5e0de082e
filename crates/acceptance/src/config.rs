//! Harness configuration, resolved once per process.
//!
//! The only external knob is `BASE_URL`, the root of the service under test.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Url;

use crate::error::{HarnessError, HarnessResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Upper bound for every UI poll, in seconds.
pub const WAIT_SECONDS: u64 = 30;

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

static GLOBAL: OnceLock<HarnessConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    base_url: String,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl HarnessConfig {
    /// Explicit configuration (tests point this at an ephemeral port).
    pub fn new(base_url: impl Into<String>) -> HarnessResult<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| HarnessError::Config(format!("BASE_URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HarnessError::Config(format!(
                "BASE_URL '{base_url}': scheme must be http or https"
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            wait_timeout: Duration::from_secs(WAIT_SECONDS),
            poll_interval: POLL_INTERVAL,
        })
    }

    /// Resolve from a key lookup; an unset or blank `BASE_URL` uses the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HarnessResult<Self> {
        let base_url = lookup("BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn from_env() -> HarnessResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Process-wide configuration, read from the environment on first use.
    pub fn global() -> HarnessResult<&'static HarnessConfig> {
        if let Some(cfg) = GLOBAL.get() {
            return Ok(cfg);
        }
        let cfg = Self::from_env()?;
        tracing::info!(base_url = %cfg.base_url, "harness configuration resolved");
        Ok(GLOBAL.get_or_init(|| cfg))
    }

    pub fn with_wait(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.wait_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Absolute URL for a path on the service (`path` starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
