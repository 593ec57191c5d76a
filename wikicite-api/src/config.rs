//! Client configuration.
//!
//! Passed to [`crate::WikiClient::new`] at construction; nothing here is
//! read from process-wide state except [`Credentials::from_env`].

use std::fmt;
use std::time::Duration;

/// English Wikipedia's API endpoint.
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Sent with every request; Wikimedia rejects anonymous user agents.
pub const DEFAULT_USER_AGENT: &str = "CitationAnalyzerBot/1.0";

/// Environment variable holding the bot user name.
pub const USERNAME_ENV: &str = "WIKI_BOT_USERNAME";

/// Environment variable holding the bot password.
pub const PASSWORD_ENV: &str = "WIKI_BOT_PASSWORD";

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RetryPolicy {
    /// Attempts per request, including the first one (default: 3).
    pub max_attempts: u32,
    /// Delay after the first failure; doubled for each further failure (default: 2s).
    pub base_delay: Duration,
    /// Upper bound for any single wait, backoff or `Retry-After` (default: 60s).
    pub max_delay: Duration,
    /// Wait used when a rate-limited response carries no usable `Retry-After` (default: 5s).
    pub default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            default_retry_after: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the next attempt after `failures` consecutive failures.
    ///
    /// `failures` counts from 1; rate-limited responses reset it to 0.
    #[must_use]
    pub fn backoff(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1_u32 << exponent)
            .min(self.max_delay)
    }

    /// Wait after a 429 response, from its `Retry-After` header in seconds.
    ///
    /// A missing or non-numeric header falls back to `default_retry_after`;
    /// either way the wait never exceeds `max_delay`.
    #[must_use]
    pub fn rate_limit_wait(&self, retry_after: Option<&str>) -> Duration {
        retry_after
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(self.default_retry_after, Duration::from_secs)
            .min(self.max_delay)
    }

    /// Attempts actually made; a zero setting still makes one attempt.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// MediaWiki API client options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ApiConfig {
    /// `api.php` endpoint (default: English Wikipedia).
    pub api_url: String,
    /// User agent for every request.
    pub user_agent: String,
    /// Pause before every API request (default: 300 ms).
    pub request_delay: Duration,
    /// Titles per content request and page size for listings (default: 50,
    /// the API's limit for non-bot accounts).
    pub batch_size: usize,
    /// Upper bound for article listings (default: 2000).
    pub max_articles: usize,
    /// Per-request timeout (default: 30s).
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            request_delay: Duration::from_millis(300),
            batch_size: 50,
            max_articles: 2000,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// Bot password credentials (`Special:BotPasswords`).
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `WIKI_BOT_USERNAME` / `WIKI_BOT_PASSWORD`; `None` if either is unset or empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let username = std::env::var(USERNAME_ENV).ok()?;
        let password = std::env::var(PASSWORD_ENV).ok()?;
        let credentials = Self::new(username, password);
        credentials.is_complete().then_some(credentials)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(10), Duration::from_secs(60));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_rate_limit_wait_uses_header() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.rate_limit_wait(Some("7")), Duration::from_secs(7));
        assert_eq!(policy.rate_limit_wait(Some(" 0 ")), Duration::ZERO);
    }

    #[test]
    fn test_rate_limit_wait_falls_back_to_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.rate_limit_wait(None), Duration::from_secs(5));
        assert_eq!(
            policy.rate_limit_wait(Some("Wed, 21 Oct 2015 07:28:00 GMT")),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_rate_limit_wait_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.rate_limit_wait(Some("86400")), Duration::from_secs(60));

        let mut tight = RetryPolicy::default();
        tight.max_delay = Duration::from_secs(1);
        assert_eq!(tight.rate_limit_wait(None), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let mut policy = RetryPolicy::default();
        policy.max_attempts = 0;
        assert_eq!(policy.attempts(), 1);
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("Bot@task", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("Bot@task"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_incomplete_credentials() {
        assert!(!Credentials::new("bot", "").is_complete());
        assert!(Credentials::new("bot", "pw").is_complete());
    }
}
