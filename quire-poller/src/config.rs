//! Poller configuration
//!
//! Defines all configurable parameters for the poller: the queue endpoint and
//! credential, where the journal and images live, and the loop timings.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use quire_core::domain::entry::CaptionStyle;

/// What happens to the rest of a batch when one message fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFailurePolicy {
    /// Log the failing message, keep processing the batch, then back off
    #[default]
    Isolate,
    /// Stop at the first failing message and back off
    Abort,
}

impl FromStr for BatchFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(Self::Isolate),
            "abort" => Ok(Self::Abort),
            other => anyhow::bail!("unknown batch failure policy: {}", other),
        }
    }
}

/// Poller configuration
///
/// Built once at start-up and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Queue pull endpoint (e.g., "http://localhost:8080/q/cat/pull")
    pub queue_url: String,

    /// Bearer token for the queue API
    pub auth_token: Option<String>,

    /// Journal file that entries are prepended to
    pub journal_path: PathBuf,

    /// Directory that image attachments are written into
    pub image_dir: PathBuf,

    /// Path prefix used in image links; defaults to `image_dir`
    pub image_link_prefix: Option<String>,

    /// Pause between poll cycles
    pub poll_interval: Duration,

    /// Bound on each queue request
    pub request_timeout: Duration,

    /// Extra pause after a failed cycle
    pub error_backoff: Duration,

    pub batch_failure_policy: BatchFailurePolicy,

    pub caption_style: CaptionStyle,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(queue_url: String) -> Self {
        Self {
            queue_url,
            auth_token: None,
            journal_path: PathBuf::from("../logs.md"),
            image_dir: PathBuf::from("../_static/imgs"),
            image_link_prefix: None,
            poll_interval: Duration::from_secs(3),
            request_timeout: Duration::from_secs(5),
            error_backoff: Duration::from_secs(3),
            batch_failure_policy: BatchFailurePolicy::default(),
            caption_style: CaptionStyle::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - QUEUE_URL (required)
    /// - AUTH_TOKEN (optional, empty means unset)
    /// - JOURNAL_PATH (optional, default: ../logs.md)
    /// - IMAGE_DIR (optional, default: ../_static/imgs)
    /// - IMAGE_LINK_PREFIX (optional, default: IMAGE_DIR)
    /// - POLL_INTERVAL (optional, seconds, default: 3)
    /// - REQUEST_TIMEOUT (optional, seconds, default: 5)
    /// - ERROR_BACKOFF (optional, seconds, default: 3)
    /// - BATCH_FAILURE_POLICY (optional, isolate|abort, default: isolate)
    /// - CAPTION_TIME (optional, utc|local, default: utc)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let queue_url = lookup("QUEUE_URL")
            .ok_or_else(|| anyhow::anyhow!("QUEUE_URL environment variable not set"))?;

        let mut config = Self::new(queue_url);

        config.auth_token = lookup("AUTH_TOKEN").filter(|t| !t.is_empty());

        if let Some(path) = lookup("JOURNAL_PATH").filter(|p| !p.is_empty()) {
            config.journal_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("IMAGE_DIR").filter(|d| !d.is_empty()) {
            config.image_dir = PathBuf::from(dir);
        }

        config.image_link_prefix = lookup("IMAGE_LINK_PREFIX").filter(|p| !p.is_empty());

        let seconds = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        config.poll_interval = seconds("POLL_INTERVAL", config.poll_interval);
        config.request_timeout = seconds("REQUEST_TIMEOUT", config.request_timeout);
        config.error_backoff = seconds("ERROR_BACKOFF", config.error_backoff);

        config.batch_failure_policy = lookup("BATCH_FAILURE_POLICY")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        config.caption_style = lookup("CAPTION_TIME")
            .and_then(|s| parse_caption_style(&s))
            .unwrap_or_default();

        Ok(config)
    }

    /// Prefix used when linking to a written image
    pub fn image_link_prefix(&self) -> String {
        self.image_link_prefix
            .clone()
            .unwrap_or_else(|| self.image_dir.to_string_lossy().into_owned())
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.queue_url.is_empty() {
            anyhow::bail!("queue_url cannot be empty");
        }

        if !self.queue_url.starts_with("http://") && !self.queue_url.starts_with("https://") {
            anyhow::bail!("queue_url must start with http:// or https://");
        }

        if self.journal_path.as_os_str().is_empty() {
            anyhow::bail!("journal_path cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8080/q/cat/pull".to_string())
    }
}

fn parse_caption_style(value: &str) -> Option<CaptionStyle> {
    match value.trim().to_ascii_lowercase().as_str() {
        "utc" => Some(CaptionStyle::Utc),
        "local" => Some(CaptionStyle::Local),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.error_backoff, Duration::from_secs(3));
        assert_eq!(config.batch_failure_policy, BatchFailurePolicy::Isolate);
        assert_eq!(config.caption_style, CaptionStyle::Utc);
        assert!(config.auth_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_requires_queue_url() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("QUEUE_URL"));
    }

    #[test]
    fn test_from_lookup_reads_everything() {
        let config = Config::from_lookup(lookup_from(&[
            ("QUEUE_URL", "https://queue.example/q/cat/pull"),
            ("AUTH_TOKEN", "abc"),
            ("JOURNAL_PATH", "/srv/site/logs.md"),
            ("IMAGE_DIR", "/srv/site/_static/imgs"),
            ("IMAGE_LINK_PREFIX", "/_static/imgs"),
            ("POLL_INTERVAL", "10"),
            ("REQUEST_TIMEOUT", "2"),
            ("ERROR_BACKOFF", "30"),
            ("BATCH_FAILURE_POLICY", "Abort"),
            ("CAPTION_TIME", "local"),
        ]))
        .unwrap();

        assert_eq!(config.queue_url, "https://queue.example/q/cat/pull");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.journal_path, PathBuf::from("/srv/site/logs.md"));
        assert_eq!(config.image_dir, PathBuf::from("/srv/site/_static/imgs"));
        assert_eq!(config.image_link_prefix(), "/_static/imgs");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.error_backoff, Duration::from_secs(30));
        assert_eq!(config.batch_failure_policy, BatchFailurePolicy::Abort);
        assert_eq!(config.caption_style, CaptionStyle::Local);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_falls_back_on_garbage() {
        let config = Config::from_lookup(lookup_from(&[
            ("QUEUE_URL", "http://localhost:9000/pull"),
            ("AUTH_TOKEN", ""),
            ("POLL_INTERVAL", "soon"),
            ("BATCH_FAILURE_POLICY", "panic"),
            ("CAPTION_TIME", "martian"),
        ]))
        .unwrap();

        assert!(config.auth_token.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.batch_failure_policy, BatchFailurePolicy::Isolate);
        assert_eq!(config.caption_style, CaptionStyle::Utc);
    }

    #[test]
    fn test_image_link_prefix_defaults_to_image_dir() {
        let config = Config::default();
        assert_eq!(config.image_link_prefix(), "../_static/imgs");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.queue_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.queue_url = "http://localhost:8080/q/cat/pull".to_string();
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_secs(3);
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        config.request_timeout = Duration::from_secs(5);
        config.journal_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_failure_policy_parse() {
        assert_eq!(
            "isolate".parse::<BatchFailurePolicy>().unwrap(),
            BatchFailurePolicy::Isolate
        );
        assert_eq!(
            " ABORT ".parse::<BatchFailurePolicy>().unwrap(),
            BatchFailurePolicy::Abort
        );
        assert!("retry".parse::<BatchFailurePolicy>().is_err());
    }
}
