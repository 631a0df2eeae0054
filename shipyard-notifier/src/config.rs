//! Relay configuration
//!
//! The relay is configured entirely through its process environment, which
//! the synthesized function definition fills in. Only `main` reads it; every
//! other component receives a [`Config`].

use std::time::Duration;

use shipyard_slack::DEFAULT_BASE_URL;

/// Conversation types searched when none are configured
pub const DEFAULT_CHANNEL_TYPES: &str = "public_channel";

/// Destination channel settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Channel name matched exactly, case-sensitive
    pub name: String,

    /// Comma separated conversation types to search (e.g. `public_channel,private_channel`)
    pub types: String,

    /// Known channel id; the lookup is skipped when set
    pub id: Option<String>,
}

/// Relay configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token used for every Slack call
    pub slack_token: String,

    /// Slack Web API root (e.g., "https://slack.com/api")
    pub slack_api_url: String,

    pub channel: ChannelConfig,

    /// Conversations requested per directory page
    pub page_size: u32,

    /// Pages scanned before the lookup gives up
    pub max_pages: u32,

    /// Timeout applied to each Slack request
    pub timeout: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(slack_token: String, channel_name: String) -> Self {
        Self {
            slack_token,
            slack_api_url: DEFAULT_BASE_URL.to_string(),
            channel: ChannelConfig {
                name: channel_name,
                types: DEFAULT_CHANNEL_TYPES.to_string(),
                id: None,
            },
            page_size: 200,
            max_pages: 100,
            timeout: Duration::from_secs(10),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - SLACK_BOT_TOKEN (required)
    /// - CHANNEL_NAME (required unless CHANNEL_ID is set)
    /// - CHANNEL_TYPES (optional, default: public_channel)
    /// - CHANNEL_ID (optional)
    /// - SLACK_API_URL (optional, default: https://slack.com/api)
    /// - CHANNEL_PAGE_SIZE (optional, default: 200)
    /// - CHANNEL_MAX_PAGES (optional, default: 100)
    /// - SLACK_TIMEOUT (optional, seconds, default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let slack_token = var("SLACK_BOT_TOKEN")
            .ok_or_else(|| anyhow::anyhow!("SLACK_BOT_TOKEN environment variable not set"))?;

        let id = var("CHANNEL_ID").filter(|s| !s.is_empty());
        let name = match (var("CHANNEL_NAME"), &id) {
            (Some(name), _) => name,
            (None, Some(_)) => String::new(),
            (None, None) => anyhow::bail!("CHANNEL_NAME environment variable not set"),
        };

        let mut config = Self::new(slack_token, name);
        config.channel.id = id;

        if let Some(types) = var("CHANNEL_TYPES").filter(|s| !s.is_empty()) {
            config.channel.types = types;
        }
        if let Some(url) = var("SLACK_API_URL").filter(|s| !s.is_empty()) {
            config.slack_api_url = url;
        }

        config.page_size = var("CHANNEL_PAGE_SIZE")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(config.page_size);

        config.max_pages = var("CHANNEL_MAX_PAGES")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(config.max_pages);

        config.timeout = var("SLACK_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(config.timeout);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.slack_token.is_empty() {
            anyhow::bail!("slack_token cannot be empty");
        }

        if self.channel.name.is_empty() && self.channel.id.is_none() {
            anyhow::bail!("channel name cannot be empty without a channel id");
        }

        if !self.slack_api_url.starts_with("http://") && !self.slack_api_url.starts_with("https://")
        {
            anyhow::bail!("slack_api_url must start with http:// or https://");
        }

        if self.page_size == 0 || self.page_size > 1000 {
            anyhow::bail!("page_size must be between 1 and 1000");
        }

        if self.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }

        if self.timeout.as_secs() == 0 {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("SLACK_BOT_TOKEN", "xoxb-1"),
            ("CHANNEL_NAME", "deploys"),
        ]))
        .unwrap();

        assert_eq!(config.slack_api_url, "https://slack.com/api");
        assert_eq!(config.channel.types, "public_channel");
        assert_eq!(config.page_size, 200);
        assert_eq!(config.max_pages, 100);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SLACK_BOT_TOKEN", "xoxb-1"),
            ("CHANNEL_NAME", "deploys"),
            ("CHANNEL_TYPES", "private_channel"),
            ("CHANNEL_PAGE_SIZE", "50"),
            ("CHANNEL_MAX_PAGES", "3"),
            ("SLACK_TIMEOUT", "2"),
            ("SLACK_API_URL", "http://localhost:9000/api"),
        ]))
        .unwrap();

        assert_eq!(config.channel.types, "private_channel");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.slack_api_url, "http://localhost:9000/api");
    }

    #[test]
    fn test_required_variables() {
        assert!(Config::from_lookup(lookup(&[("CHANNEL_NAME", "deploys")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SLACK_BOT_TOKEN", "xoxb-1")])).is_err());

        // A channel id stands in for the name
        let config = Config::from_lookup(lookup(&[
            ("SLACK_BOT_TOKEN", "xoxb-1"),
            ("CHANNEL_ID", "C123"),
        ]))
        .unwrap();
        assert_eq!(config.channel.id.as_deref(), Some("C123"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::new("xoxb-1".to_string(), "deploys".to_string());
        assert!(config.validate().is_ok());

        config.slack_api_url = "slack.com".to_string();
        assert!(config.validate().is_err());
        config.slack_api_url = "https://slack.com/api".to_string();

        config.page_size = 0;
        assert!(config.validate().is_err());
        config.page_size = 200;

        config.max_pages = 0;
        assert!(config.validate().is_err());
        config.max_pages = 1;

        config.channel.name = String::new();
        assert!(config.validate().is_err());
    }
}
