//! Inbound events as the dispatcher sees them.

use crate::types::{ChannelId, GuildId, MessageId, UserId};

/// The user behind a message or interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    /// Account name, used for ticket channel names
    pub name: String,
    /// Name shown in the guild, used in prompts
    pub display_name: String,
    pub bot: bool,
}

/// Points at one posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel: ChannelId,
    pub message: MessageId,
}

/// A message delivered by the gateway.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// `None` for direct messages
    pub guild_id: Option<GuildId>,
    pub author: Author,
    pub content: String,
    /// Whether the bot user is among the message's mentions
    pub mentions_bot: bool,
}

impl InboundMessage {
    pub fn reference(&self) -> MessageRef {
        MessageRef {
            channel: self.channel_id,
            message: self.id,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}

/// Identifies an interaction that still awaits a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
}

/// A button press on a message component.
#[derive(Debug, Clone)]
pub struct ComponentPress {
    pub interaction: InteractionRef,
    pub custom_id: String,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub user: Author,
}
