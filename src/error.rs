//! Error types for tallybot.
//!
//! The counting game and rate limiter never fail; everything here comes from
//! configuration or from the services the bot talks to.

use thiserror::Error;

/// Main error type for tallybot operations.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discord API or gateway errors
    #[error("Discord error: {0}")]
    Gateway(#[from] serenity::Error),

    /// A gateway call that could not be carried out
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Text generation errors
    #[error("Generation error: {0}")]
    Generation(String),

    /// HTTP transport errors from the generation client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for BotError {
    fn from(err: config::ConfigError) -> Self {
        BotError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for BotError {
    fn from(err: serde_yaml::Error) -> Self {
        BotError::Config(err.to_string())
    }
}

/// Result type alias for tallybot operations.
pub type Result<T> = std::result::Result<T, BotError>;
