//! Outbound effects the dispatcher asks the chat platform to perform.

use async_trait::async_trait;
use std::time::Duration;

use super::event::{InteractionRef, MessageRef};
use crate::error::Result;
use crate::tickets::TicketKind;
use crate::types::{ChannelId, GuildId, UserId};

/// Reactions the bot places on counting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Check,
    Cross,
}

impl Reaction {
    pub fn emoji(self) -> &'static str {
        match self {
            Reaction::Check => "✅",
            Reaction::Cross => "❌",
        }
    }
}

/// A rich message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// `(name, value, inline)`
    pub fields: Vec<(String, String, bool)>,
    pub footer: Option<String>,
    pub image_url: Option<String>,
}

/// A private channel to open for a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketChannel {
    pub name: String,
    pub topic: String,
    pub category: ChannelId,
    /// The only member besides the bot allowed to see the channel
    pub owner: UserId,
}

/// A text channel and its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTopic {
    pub id: ChannelId,
    pub topic: Option<String>,
}

/// Trait for the chat platform the bot runs on.
///
/// Implemented over serenity for production and by an in-memory recorder in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// The bot's own user id.
    fn bot_id(&self) -> UserId;

    /// Reply to a message without pinging its author.
    async fn reply(&self, to: MessageRef, content: &str) -> Result<()>;

    /// Post a plain message in a channel.
    async fn send(&self, channel: ChannelId, content: &str) -> Result<()>;

    async fn send_embed(&self, channel: ChannelId, embed: &Embed) -> Result<()>;

    /// Post an embed with one button per ticket kind.
    async fn send_ticket_panel(
        &self,
        channel: ChannelId,
        embed: &Embed,
        kinds: &[TicketKind],
    ) -> Result<()>;

    async fn react(&self, to: MessageRef, reaction: Reaction) -> Result<()>;

    async fn delete_message(&self, message: MessageRef) -> Result<()>;

    /// Show the typing indicator in a channel.
    async fn broadcast_typing(&self, channel: ChannelId) -> Result<()>;

    /// Whether `user` holds the administrator permission in `guild`.
    async fn is_admin(&self, guild: GuildId, user: UserId) -> Result<bool>;

    /// Prevent `user` from communicating in `guild` for `duration`.
    async fn timeout_member(
        &self,
        guild: GuildId,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<()>;

    async fn channel_topic(&self, channel: ChannelId) -> Result<Option<String>>;

    /// Every text channel in the guild with its topic.
    async fn guild_channel_topics(&self, guild: GuildId) -> Result<Vec<ChannelTopic>>;

    /// Find the category named `name`, creating it when missing.
    async fn ensure_category(&self, guild: GuildId, name: &str) -> Result<ChannelId>;

    async fn create_ticket_channel(&self, guild: GuildId, channel: &TicketChannel)
        -> Result<ChannelId>;

    async fn delete_channel(&self, channel: ChannelId) -> Result<()>;

    /// Answer an interaction with a message only the presser can see.
    async fn respond_ephemeral(&self, interaction: &InteractionRef, content: &str) -> Result<()>;
}
