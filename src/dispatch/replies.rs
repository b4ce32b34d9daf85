//! User-facing text.

use std::time::Duration;

use super::gateway::Embed;
use crate::counting::{GameState, Milestone, Outcome};
use crate::tickets::TicketKind;
use crate::types::{ChannelId, UserId};

pub const RATE_LIMITED: &str =
    "⏰ You're sending messages too quickly! Please wait a moment before trying again.";
pub const GREETING: &str = "Hi! What would you like to talk about?";
pub const GENERATION_FAILED: &str =
    "Sorry, I'm having trouble responding right now. Please try again later.";
pub const NOT_A_TICKET: &str = "❌ This is not a ticket channel.";
pub const GUILD_ONLY: &str = "❌ This command only works in servers.";
pub const NO_GAME_TO_RESET: &str = "❌ No counting game to reset.";
pub const COMMAND_FAILED: &str = "❌ An error occurred while processing the command.";
pub const INVITE_TIMEOUT_REASON: &str = "Posted Discord invite link";

const HELP_COLOR: u32 = 0x00ff00;
const PANEL_COLOR: u32 = 0x5865f2;
const TICKET_COLOR: u32 = 0x57f287;

pub fn mention(user: UserId) -> String {
    format!("<@{user}>")
}

pub fn channel_mention(channel: ChannelId) -> String {
    format!("<#{channel}>")
}

/// Where a count came from, which changes how the next move is described.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource<'a> {
    /// A bare number typed in a channel
    Message,
    /// The `count` command with this prefix
    Command(&'a str),
}

impl CountSource<'_> {
    fn next_move(&self, number: u64) -> String {
        match self {
            CountSource::Message => format!("**{number}**"),
            CountSource::Command(prefix) => format!("`{prefix}count {number}`"),
        }
    }
}

/// Text posted for a counting outcome, if any.
///
/// Ordinary accepted counts above 5 only get a reaction when typed as a bare
/// number, to keep the channel quiet.
pub fn outcome_text(outcome: Outcome, author: UserId, source: CountSource<'_>) -> Option<String> {
    let who = mention(author);
    let text = match outcome {
        Outcome::Started => format!(
            "🎉 **Counting Game Started!** {who} started with **1**\nNext person should type {}",
            source.next_move(2)
        ),
        Outcome::Accepted(n) => {
            let next = n.saturating_add(1);
            match Milestone::classify(n) {
                Some(Milestone::Huge) => {
                    format!("🎊 **AMAZING!** {who} reached **{n}**! 🎊\nNext: **{next}**")
                }
                Some(Milestone::Great) => {
                    format!("🌟 **Fantastic!** {who} counted **{n}**! 🌟\nNext: **{next}**")
                }
                Some(Milestone::Nice) if n % 25 == 0 => {
                    format!("⭐ **Great job!** {who} counted **{n}**!\nNext: **{next}**")
                }
                Some(Milestone::Nice) => format!("✨ {who} counted **{n}**!\nNext: **{next}**"),
                None if n <= 5 || source != CountSource::Message => {
                    format!("✅ {who} counted **{n}**! Next: **{next}**")
                }
                None => return None,
            }
        }
        Outcome::RejectedNotStartedAtOne => format!(
            "❌ Start counting from **1** to begin the game! Use {}",
            source.next_move(1)
        ),
        Outcome::RejectedDoublePost => {
            format!("❌ {who} You can't count twice in a row! Let someone else continue.")
        }
        Outcome::RejectedWrongNumber { expected, got } => format!(
            "❌ Wrong number! Expected **{expected}**, but got **{got}**.\n💥 **Game Over!** Counting restarted. Type {} to start over.",
            source.next_move(1)
        ),
    };
    Some(text)
}

/// Reaction placed on a bare-number message.
pub fn outcome_reaction(outcome: Outcome) -> super::gateway::Reaction {
    if outcome.is_success() {
        super::gateway::Reaction::Check
    } else {
        super::gateway::Reaction::Cross
    }
}

pub fn game_status(state: Option<GameState>, prefix: &str) -> String {
    match state {
        Some(state) => format!(
            "🔢 **Current Count:** {}\nNext number should be: **{}**",
            state.current,
            state.expected()
        ),
        None => format!(
            "🔢 **Counting Game**\nNo counting game started yet! Use `{prefix}count 1` to start counting from 1."
        ),
    }
}

pub fn game_reset(prefix: &str) -> String {
    format!("🔄 **Counting game reset!** Use `{prefix}count 1` to start over.")
}

pub fn count_usage(prefix: &str) -> String {
    format!("❌ Please provide a whole number, for example `{prefix}count 1`.")
}

pub fn chat_usage(prefix: &str) -> String {
    format!("❌ Please provide a message to chat with the AI. Example: `{prefix}chat Hello there!`")
}

pub fn unknown_command(prefix: &str) -> String {
    format!("❌ Command not found. Use `{prefix}help` to see available commands.")
}

pub fn closing_ticket(delay: Duration) -> String {
    format!("🔒 Closing ticket in {} seconds...", delay.as_secs())
}

pub fn invite_timeout(user: UserId, duration: Duration) -> String {
    format!(
        "🚫 {} has been timed out for {} for sharing an invite link.",
        mention(user),
        describe_duration(duration)
    )
}

/// "7 days", "1 hour", "90 seconds" and so on, using the largest whole unit.
pub fn describe_duration(duration: Duration) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "day"), (3_600, "hour"), (60, "minute"), (1, "second")];

    let secs = duration.as_secs();
    let (size, unit) = UNITS
        .into_iter()
        .find(|(size, _)| secs >= *size && secs % size == 0)
        .unwrap_or((1, "second"));
    let count = secs / size;
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural}")
}

pub fn ticket_exists(channel: ChannelId) -> String {
    format!("❗ You already have a ticket: {}", channel_mention(channel))
}

pub fn ticket_created(channel: ChannelId) -> String {
    format!("✅ Ticket created: {}", channel_mention(channel))
}

pub fn ticket_welcome(kind: TicketKind, owner: UserId, prefix: &str) -> Embed {
    Embed {
        title: format!("🎫 Ticket - {}", kind.title()),
        description: format!(
            "{}, thanks for contacting support!\nType `{prefix}close` to close this ticket.",
            mention(owner)
        ),
        color: TICKET_COLOR,
        ..Embed::default()
    }
}

pub fn ticket_panel(title: &str, description: &str, footer: Option<&str>, image: Option<&str>) -> Embed {
    Embed {
        title: title.to_string(),
        description: description.to_string(),
        color: PANEL_COLOR,
        footer: footer.map(str::to_string),
        image_url: image.map(str::to_string),
        ..Embed::default()
    }
}

pub fn help(prefix: &str, max_requests: usize, window: Duration, tickets: bool) -> Embed {
    let mut commands = vec![
        format!("`{prefix}help` - Show this help message"),
        format!("`{prefix}chat [message]` - Chat with AI using command"),
        format!("`{prefix}count [number]` - Start, continue or show the counting game"),
        format!("`{prefix}reset_count` - Reset counting game"),
    ];
    if tickets {
        commands.push(format!("`{prefix}ticket` - Post the support ticket panel"));
        commands.push(format!("`{prefix}close` - Close the current ticket"));
    }

    Embed {
        title: "🤖 AI Discord Bot Help".to_string(),
        description: "I'm an AI assistant that can chat with you!".to_string(),
        color: HELP_COLOR,
        fields: vec![
            (
                "💬 How to Chat".to_string(),
                format!(
                    "• Mention me in a message: `@bot your message`\n• Send me a direct message\n• Use commands with `{prefix}`"
                ),
                false,
            ),
            ("🔧 Commands".to_string(), commands.join("\n"), false),
            (
                "🔢 Counting Game".to_string(),
                "• Type **1** to start counting\n• Next person types **2**, then **3**, etc.\n• Same person can't count twice in a row\n• Wrong number resets the game".to_string(),
                false,
            ),
            (
                "⚡ Rate Limits".to_string(),
                format!(
                    "Maximum {max_requests} requests per {} per user",
                    describe_duration(window).trim_start_matches("1 ")
                ),
                false,
            ),
        ],
        footer: None,
        image_url: None,
    }
}
