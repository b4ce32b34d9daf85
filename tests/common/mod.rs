//! In-memory gateway and generator shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tallybot::ai::TextGenerator;
use tallybot::clock::ManualClock;
use tallybot::config::BotConfig;
use tallybot::dispatch::{
    Author, ChannelTopic, ComponentPress, DispatchSettings, Dispatcher, Embed, Gateway,
    InboundMessage, InteractionRef, MessageRef, Reaction, TicketChannel,
};
use tallybot::error::{BotError, Result};
use tallybot::ratelimit::Quota;
use tallybot::store::BotState;
use tallybot::tickets::TicketKind;
use tallybot::types::{ChannelId, GuildId, MessageId, UserId};

pub const BOT: UserId = UserId(99);
pub const GUILD: GuildId = GuildId(1);
pub const CHANNEL: ChannelId = ChannelId(10);
pub const ANA: UserId = UserId(7);
pub const BEN: UserId = UserId(8);

/// Everything the dispatcher asked the platform to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Reply(MessageRef, String),
    Send(ChannelId, String),
    Embed(ChannelId, Embed),
    Panel(ChannelId, Vec<TicketKind>),
    React(MessageRef, Reaction),
    Delete(MessageRef),
    Typing(ChannelId),
    Timeout(GuildId, UserId, Duration),
    Category(String),
    CreateChannel(TicketChannel),
    DeleteChannel(ChannelId),
    Ephemeral(u64, String),
}

/// Gateway that records every effect instead of talking to Discord.
pub struct RecordingGateway {
    pub admins: Vec<UserId>,
    pub admin_check_fails: bool,
    pub fail_embeds: bool,
    pub topics: HashMap<ChannelId, String>,
    next_channel: AtomicU64,
    effects: Mutex<Vec<Effect>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            admins: Vec::new(),
            admin_check_fails: false,
            fail_embeds: false,
            topics: HashMap::new(),
            next_channel: AtomicU64::new(500),
            effects: Mutex::new(Vec::new()),
        }
    }

    /// Take every effect recorded so far.
    pub fn drain(&self) -> Vec<Effect> {
        std::mem::take(&mut *self.effects.lock())
    }

    fn record(&self, effect: Effect) -> Result<()> {
        self.effects.lock().push(effect);
        Ok(())
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    fn bot_id(&self) -> UserId {
        BOT
    }

    async fn reply(&self, to: MessageRef, content: &str) -> Result<()> {
        self.record(Effect::Reply(to, content.to_string()))
    }

    async fn send(&self, channel: ChannelId, content: &str) -> Result<()> {
        self.record(Effect::Send(channel, content.to_string()))
    }

    async fn send_embed(&self, channel: ChannelId, embed: &Embed) -> Result<()> {
        if self.fail_embeds {
            return Err(BotError::Delivery("embeds disabled".into()));
        }
        self.record(Effect::Embed(channel, embed.clone()))
    }

    async fn send_ticket_panel(
        &self,
        channel: ChannelId,
        _embed: &Embed,
        kinds: &[TicketKind],
    ) -> Result<()> {
        self.record(Effect::Panel(channel, kinds.to_vec()))
    }

    async fn react(&self, to: MessageRef, reaction: Reaction) -> Result<()> {
        self.record(Effect::React(to, reaction))
    }

    async fn delete_message(&self, message: MessageRef) -> Result<()> {
        self.record(Effect::Delete(message))
    }

    async fn broadcast_typing(&self, channel: ChannelId) -> Result<()> {
        self.record(Effect::Typing(channel))
    }

    async fn is_admin(&self, _guild: GuildId, user: UserId) -> Result<bool> {
        if self.admin_check_fails {
            return Err(BotError::Delivery("member lookup failed".into()));
        }
        Ok(self.admins.contains(&user))
    }

    async fn timeout_member(
        &self,
        guild: GuildId,
        user: UserId,
        duration: Duration,
        _reason: &str,
    ) -> Result<()> {
        self.record(Effect::Timeout(guild, user, duration))
    }

    async fn channel_topic(&self, channel: ChannelId) -> Result<Option<String>> {
        Ok(self.topics.get(&channel).cloned())
    }

    async fn guild_channel_topics(&self, _guild: GuildId) -> Result<Vec<ChannelTopic>> {
        Ok(self
            .topics
            .iter()
            .map(|(id, topic)| ChannelTopic {
                id: *id,
                topic: Some(topic.clone()),
            })
            .collect())
    }

    async fn ensure_category(&self, _guild: GuildId, name: &str) -> Result<ChannelId> {
        self.record(Effect::Category(name.to_string()))?;
        Ok(ChannelId(400))
    }

    async fn create_ticket_channel(
        &self,
        _guild: GuildId,
        channel: &TicketChannel,
    ) -> Result<ChannelId> {
        self.record(Effect::CreateChannel(channel.clone()))?;
        Ok(ChannelId(self.next_channel.fetch_add(1, Ordering::SeqCst)))
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<()> {
        self.record(Effect::DeleteChannel(channel))
    }

    async fn respond_ephemeral(&self, interaction: &InteractionRef, content: &str) -> Result<()> {
        self.record(Effect::Ephemeral(interaction.id, content.to_string()))
    }
}

/// Generator that returns a fixed reply and keeps the prompts it saw.
pub struct CannedGenerator {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| BotError::Generation("service unavailable".into()))
    }
}

pub fn settings() -> DispatchSettings {
    let mut settings = DispatchSettings::from(&BotConfig::default());
    settings.ticket_close_delay = Duration::ZERO;
    settings
}

/// A dispatcher wired to a manual clock and a canned generator.
pub struct Harness {
    pub dispatcher: Dispatcher<ManualClock>,
    pub generator: Arc<CannedGenerator>,
    pub clock: ManualClock,
    next_message: AtomicU64,
}

impl Harness {
    pub fn new(generator: CannedGenerator) -> Self {
        Self::with_settings(generator, Quota::default(), settings())
    }

    pub fn with_settings(
        generator: CannedGenerator,
        quota: Quota,
        settings: DispatchSettings,
    ) -> Self {
        let clock = ManualClock::new();
        let state = Arc::new(BotState::with_clock(quota, clock.clone()));
        let generator = Arc::new(generator);
        let dispatcher = Dispatcher::new(state, generator.clone(), settings);
        Self {
            dispatcher,
            generator,
            clock,
            next_message: AtomicU64::new(1000),
        }
    }

    /// Build a message from `author` in the test guild.
    pub fn guild_message(&self, author: UserId, content: &str) -> InboundMessage {
        self.message(author, Some(GUILD), content)
    }

    /// Build a direct message from `author`.
    pub fn direct_message(&self, author: UserId, content: &str) -> InboundMessage {
        self.message(author, None, content)
    }

    fn message(&self, author: UserId, guild: Option<GuildId>, content: &str) -> InboundMessage {
        InboundMessage {
            id: MessageId(self.next_message.fetch_add(1, Ordering::SeqCst)),
            channel_id: CHANNEL,
            guild_id: guild,
            author: author_named(author),
            content: content.to_string(),
            mentions_bot: content.contains(&format!("<@{BOT}>")),
        }
    }

    pub fn press(&self, user: UserId, custom_id: &str) -> ComponentPress {
        ComponentPress {
            interaction: InteractionRef {
                id: 77,
                token: "token".to_string(),
            },
            custom_id: custom_id.to_string(),
            guild_id: Some(GUILD),
            channel_id: CHANNEL,
            user: author_named(user),
        }
    }
}

pub fn author_named(id: UserId) -> Author {
    let name = match id {
        ANA => "Ana",
        BEN => "Ben",
        _ => "Someone",
    };
    Author {
        id,
        name: name.to_string(),
        display_name: name.to_string(),
        bot: false,
    }
}
