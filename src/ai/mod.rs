//! Text generation for chat replies.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::Result;

/// Sent when the service returns an empty reply.
pub const EMPTY_REPLY: &str = "Sorry, I couldn't generate a response.";

/// Trait for text generation backends.
///
/// The dispatcher only needs a prompt in and text out, so tests can swap in a
/// canned implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the prompt sent for a user message.
pub fn build_prompt(system_prompt: &str, display_name: &str, text: &str) -> String {
    format!("{system_prompt}\n\n{display_name} says: {text}")
}

/// Trim a generated reply and fit it into `max_chars` characters.
///
/// Over-long replies keep their first `max_chars - 3` characters followed by "...".
pub fn fit_reply(raw: &str, max_chars: usize) -> String {
    let reply = raw.trim();
    if reply.is_empty() {
        return EMPTY_REPLY.to_string();
    }

    if reply.chars().count() <= max_chars {
        return reply.to_string();
    }

    let mut cut: String = reply.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
