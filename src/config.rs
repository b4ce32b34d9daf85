//! Configuration management for tallybot.
//!
//! Values come from an optional YAML file overlaid by `TALLYBOT__SECTION__KEY`
//! environment variables. The Discord token and Gemini key may also be given
//! through the conventional `DISCORD_TOKEN` and `GEMINI_API_KEY` variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::{BotError, Result};
use crate::ratelimit::Quota;

const ENV_PREFIX: &str = "TALLYBOT";
const ENV_SEPARATOR: &str = "__";

/// Main configuration for the bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub moderation: ModerationConfig,

    #[serde(default)]
    pub tickets: TicketConfig,
}

/// Discord connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal
    #[serde(default)]
    pub token: String,

    /// Prefix for text commands
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

/// Rate limiting configuration for AI requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Requests admitted per user inside the window
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often idle users are dropped from the limiter, in seconds (0 disables)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl RateLimitingConfig {
    pub fn quota(&self) -> Quota {
        Quota::new(self.max_requests, Duration::from_secs(self.window_secs))
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

fn default_max_requests() -> usize {
    10
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_interval() -> u64 {
    300
}

/// Text generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Google Gemini API key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Replies longer than this are cut and end in "..."
    #[serde(default = "default_max_reply_chars")]
    pub max_reply_chars: usize,

    /// Attempts on 429 / 5xx before giving up
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_reply_chars: default_max_reply_chars(),
            retry_attempts: default_retry_attempts(),
            request_timeout_secs: default_request_timeout(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_reply_chars() -> usize {
    2000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    60
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant in a Discord chat. \
     Respond naturally and conversationally. \
     Keep responses concise but informative. \
     Be friendly and engaging."
        .to_string()
}

/// Invite-link moderation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Timeout applied to members who post an invite, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    7 * 24 * 60 * 60
}

/// Support ticket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Category that holds ticket channels; created on demand
    #[serde(default = "default_category")]
    pub category_name: String,

    /// Delay between `close` and the channel being deleted, in seconds
    #[serde(default = "default_close_delay")]
    pub close_delay_secs: u64,

    #[serde(default = "default_panel_title")]
    pub panel_title: String,

    #[serde(default = "default_panel_description")]
    pub panel_description: String,

    #[serde(default)]
    pub panel_footer: Option<String>,

    #[serde(default)]
    pub panel_image_url: Option<String>,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            category_name: default_category(),
            close_delay_secs: default_close_delay(),
            panel_title: default_panel_title(),
            panel_description: default_panel_description(),
            panel_footer: None,
            panel_image_url: None,
        }
    }
}

impl TicketConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_secs(self.close_delay_secs)
    }
}

fn default_category() -> String {
    "Support Tickets".to_string()
}

fn default_close_delay() -> u64 {
    5
}

fn default_panel_title() -> String {
    "📩 Contact support!".to_string()
}

fn default_panel_description() -> String {
    "You can contact our support at any time. We are here to help you.".to_string()
}

impl BotConfig {
    /// Load configuration from an optional file plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            info!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let mut config: BotConfig = settings.try_deserialize()?;
        config.apply_secret_env();
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Fill the token and API key from their conventional variables when unset.
    fn apply_secret_env(&mut self) {
        if self.discord.token.is_empty() {
            if let Ok(token) = std::env::var("DISCORD_TOKEN") {
                self.discord.token = token;
            }
        }
        if self.ai.api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                self.ai.api_key = key;
            }
        }
    }

    /// Check the values the bot cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.discord.token.trim().is_empty() {
            return Err(BotError::Config("DISCORD_TOKEN is required".into()));
        }
        if self.ai.api_key.trim().is_empty() {
            return Err(BotError::Config("GEMINI_API_KEY is required".into()));
        }
        if self.discord.prefix.is_empty() {
            return Err(BotError::Config("command prefix must not be empty".into()));
        }
        if self.rate_limiting.max_requests == 0 {
            return Err(BotError::Config("rate_limiting.max_requests must be at least 1".into()));
        }
        if self.rate_limiting.window_secs == 0 {
            return Err(BotError::Config("rate_limiting.window_secs must be at least 1".into()));
        }
        if self.ai.max_reply_chars < 4 {
            return Err(BotError::Config("ai.max_reply_chars must be at least 4".into()));
        }
        Ok(())
    }
}
