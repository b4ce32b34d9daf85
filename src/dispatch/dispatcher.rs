//! Routing of inbound messages and button presses.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::event::{ComponentPress, InboundMessage};
use super::gateway::{Gateway, TicketChannel};
use super::replies::{self, CountSource};
use crate::ai::{self, TextGenerator};
use crate::clock::{Clock, SystemClock};
use crate::config::BotConfig;
use crate::counting::Outcome;
use crate::error::Result;
use crate::moderation;
use crate::store::BotState;
use crate::tickets::{self, TicketKind};
use crate::types::{GuildId, UserId};

/// Settings the dispatcher reads on every event.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub prefix: String,
    pub system_prompt: String,
    pub max_reply_chars: usize,
    pub moderation_enabled: bool,
    pub invite_timeout: Duration,
    pub tickets_enabled: bool,
    pub ticket_category: String,
    pub ticket_close_delay: Duration,
    pub panel_title: String,
    pub panel_description: String,
    pub panel_footer: Option<String>,
    pub panel_image_url: Option<String>,
}

impl From<&BotConfig> for DispatchSettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            prefix: config.discord.prefix.clone(),
            system_prompt: config.ai.system_prompt.clone(),
            max_reply_chars: config.ai.max_reply_chars,
            moderation_enabled: config.moderation.enabled,
            invite_timeout: config.moderation.timeout(),
            tickets_enabled: config.tickets.enabled,
            ticket_category: config.tickets.category_name.clone(),
            ticket_close_delay: config.tickets.close_delay(),
            panel_title: config.tickets.panel_title.clone(),
            panel_description: config.tickets.panel_description.clone(),
            panel_footer: config.tickets.panel_footer.clone(),
            panel_image_url: config.tickets.panel_image_url.clone(),
        }
    }
}

/// Decides what the bot does with each inbound event.
///
/// The gateway is passed per call since platform handles are scoped to an event.
pub struct Dispatcher<C: Clock = SystemClock> {
    state: Arc<BotState<C>>,
    generator: Arc<dyn TextGenerator>,
    settings: DispatchSettings,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(
        state: Arc<BotState<C>>,
        generator: Arc<dyn TextGenerator>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            state,
            generator,
            settings,
        }
    }

    pub fn state(&self) -> &Arc<BotState<C>> {
        &self.state
    }

    /// Handle one inbound message.
    ///
    /// Order: bot authors are ignored, then invite moderation, prefix commands,
    /// counting, and finally AI chat for mentions and direct messages.
    #[instrument(
        skip(self, gateway, message),
        fields(user = %message.author.id, channel = %message.channel_id)
    )]
    pub async fn handle_message(
        &self,
        gateway: &dyn Gateway,
        message: &InboundMessage,
    ) -> Result<()> {
        if message.author.bot || message.author.id == gateway.bot_id() {
            return Ok(());
        }

        if self.settings.moderation_enabled && moderation::contains_invite(&message.content) {
            if let Some(guild) = message.guild_id {
                self.moderate_invite(gateway, guild, message).await;
            }
            return Ok(());
        }

        if let Some(command) = message.content.strip_prefix(self.settings.prefix.as_str()) {
            return self.handle_command(gateway, message, command).await;
        }

        if is_digit_only(&message.content) {
            if let Some(guild) = message.guild_id {
                self.count_from_message(gateway, guild, message).await?;
            }
            return Ok(());
        }

        if !(message.mentions_bot || message.is_direct()) {
            return Ok(());
        }

        if self.state.is_rate_limited(message.author.id) {
            return gateway
                .reply(message.reference(), replies::RATE_LIMITED)
                .await;
        }

        if let Err(e) = gateway.broadcast_typing(message.channel_id).await {
            debug!(error = %e, "Failed to show typing indicator");
        }

        let text = strip_mention(&message.content, gateway.bot_id());
        if text.is_empty() {
            return gateway.reply(message.reference(), replies::GREETING).await;
        }

        let reply = self.generate_reply(&text, &message.author.display_name).await;
        gateway.reply(message.reference(), &reply).await
    }

    /// Handle a button press. Presses on unknown components are ignored.
    #[instrument(skip(self, gateway, press), fields(user = %press.user.id, custom_id = %press.custom_id))]
    pub async fn handle_component(
        &self,
        gateway: &dyn Gateway,
        press: &ComponentPress,
    ) -> Result<()> {
        let Some(kind) = TicketKind::from_custom_id(&press.custom_id) else {
            return Ok(());
        };
        if !self.settings.tickets_enabled {
            return Ok(());
        }
        let Some(guild) = press.guild_id else {
            return Ok(());
        };

        let owner = press.user.id;
        let channels = gateway.guild_channel_topics(guild).await?;
        if let Some(existing) = channels
            .iter()
            .find(|c| tickets::is_owned_by(c.topic.as_deref(), owner))
        {
            return gateway
                .respond_ephemeral(&press.interaction, &replies::ticket_exists(existing.id))
                .await;
        }

        let category = gateway
            .ensure_category(guild, &self.settings.ticket_category)
            .await?;
        let request = TicketChannel {
            name: tickets::channel_name(kind, &press.user.name),
            topic: tickets::channel_topic(owner),
            category,
            owner,
        };
        let channel = gateway.create_ticket_channel(guild, &request).await?;
        info!(guild = %guild, channel = %channel, kind = kind.slug(), "Ticket opened");

        gateway
            .respond_ephemeral(&press.interaction, &replies::ticket_created(channel))
            .await?;
        gateway
            .send_embed(
                channel,
                &replies::ticket_welcome(kind, owner, &self.settings.prefix),
            )
            .await
    }

    async fn moderate_invite(&self, gateway: &dyn Gateway, guild: GuildId, message: &InboundMessage) {
        let author = message.author.id;
        match gateway.is_admin(guild, author).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                warn!(guild = %guild, user = %author, error = %e, "Could not check permissions for invite poster");
                return;
            }
        }

        let timeout = self.settings.invite_timeout;
        let result: Result<()> = async {
            gateway.delete_message(message.reference()).await?;
            gateway
                .timeout_member(guild, author, timeout, replies::INVITE_TIMEOUT_REASON)
                .await?;
            gateway
                .send(message.channel_id, &replies::invite_timeout(author, timeout))
                .await
        }
        .await;

        match result {
            Ok(()) => info!(guild = %guild, user = %author, "Timed out member for invite link"),
            Err(e) => warn!(guild = %guild, user = %author, error = %e, "Failed to timeout user"),
        }
    }

    async fn count_from_message(
        &self,
        gateway: &dyn Gateway,
        guild: GuildId,
        message: &InboundMessage,
    ) -> Result<()> {
        let author = message.author.id;
        let Some(outcome) = self
            .state
            .submit(guild, author, message.channel_id, &message.content)
        else {
            return Ok(());
        };

        gateway
            .react(message.reference(), replies::outcome_reaction(outcome))
            .await?;
        if let Some(text) = replies::outcome_text(outcome, author, CountSource::Message) {
            gateway.reply(message.reference(), &text).await?;
        }
        Ok(())
    }

    async fn handle_command(
        &self,
        gateway: &dyn Gateway,
        message: &InboundMessage,
        command: &str,
    ) -> Result<()> {
        let command = command.trim_start();
        let (name, args) = match command.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (command, ""),
        };
        if name.is_empty() {
            return Ok(());
        }

        debug!(command = name, "Dispatching command");
        let result = match name {
            "help" => self.command_help(gateway, message).await,
            "chat" => self.command_chat(gateway, message, args).await,
            "count" => self.command_count(gateway, message, args).await,
            "reset_count" => self.command_reset_count(gateway, message).await,
            "ticket" if self.settings.tickets_enabled => self.command_ticket(gateway, message).await,
            "close" if self.settings.tickets_enabled => self.command_close(gateway, message).await,
            _ => {
                gateway
                    .send(message.channel_id, &replies::unknown_command(&self.settings.prefix))
                    .await
            }
        };

        if let Err(e) = result {
            error!(command = name, error = %e, "Command error");
            gateway
                .send(message.channel_id, replies::COMMAND_FAILED)
                .await?;
        }
        Ok(())
    }

    async fn command_help(&self, gateway: &dyn Gateway, message: &InboundMessage) -> Result<()> {
        let quota = self.state.limiter().quota();
        let embed = replies::help(
            &self.settings.prefix,
            quota.max_requests,
            quota.window,
            self.settings.tickets_enabled,
        );
        gateway.send_embed(message.channel_id, &embed).await
    }

    async fn command_chat(
        &self,
        gateway: &dyn Gateway,
        message: &InboundMessage,
        text: &str,
    ) -> Result<()> {
        if text.is_empty() {
            return gateway
                .send(message.channel_id, &replies::chat_usage(&self.settings.prefix))
                .await;
        }

        if self.state.is_rate_limited(message.author.id) {
            return gateway.send(message.channel_id, replies::RATE_LIMITED).await;
        }

        if let Err(e) = gateway.broadcast_typing(message.channel_id).await {
            debug!(error = %e, "Failed to show typing indicator");
        }

        let reply = self.generate_reply(text, &message.author.display_name).await;
        gateway.send(message.channel_id, &reply).await
    }

    async fn command_count(
        &self,
        gateway: &dyn Gateway,
        message: &InboundMessage,
        args: &str,
    ) -> Result<()> {
        let prefix = self.settings.prefix.as_str();
        let Some(guild) = message.guild_id else {
            return gateway.send(message.channel_id, replies::GUILD_ONLY).await;
        };

        if args.is_empty() {
            let status = replies::game_status(self.state.game_status(guild), prefix);
            return gateway.send(message.channel_id, &status).await;
        }

        let author = message.author.id;
        let text = match self.state.submit(guild, author, message.channel_id, args) {
            Some(outcome) => outcome_text_for_command(outcome, author, prefix),
            None => replies::count_usage(prefix),
        };
        gateway.send(message.channel_id, &text).await
    }

    async fn command_reset_count(
        &self,
        gateway: &dyn Gateway,
        message: &InboundMessage,
    ) -> Result<()> {
        let Some(guild) = message.guild_id else {
            return gateway.send(message.channel_id, replies::GUILD_ONLY).await;
        };

        let text = if self.state.reset_game(guild) {
            replies::game_reset(&self.settings.prefix)
        } else {
            replies::NO_GAME_TO_RESET.to_string()
        };
        gateway.send(message.channel_id, &text).await
    }

    async fn command_ticket(&self, gateway: &dyn Gateway, message: &InboundMessage) -> Result<()> {
        if message.guild_id.is_none() {
            return gateway.send(message.channel_id, replies::GUILD_ONLY).await;
        }

        let panel = replies::ticket_panel(
            &self.settings.panel_title,
            &self.settings.panel_description,
            self.settings.panel_footer.as_deref(),
            self.settings.panel_image_url.as_deref(),
        );
        gateway
            .send_ticket_panel(message.channel_id, &panel, &TicketKind::ALL)
            .await
    }

    async fn command_close(&self, gateway: &dyn Gateway, message: &InboundMessage) -> Result<()> {
        let topic = gateway.channel_topic(message.channel_id).await?;
        if message.guild_id.is_none() || !tickets::is_ticket_topic(topic.as_deref()) {
            return gateway.send(message.channel_id, replies::NOT_A_TICKET).await;
        }

        let delay = self.settings.ticket_close_delay;
        gateway
            .send(message.channel_id, &replies::closing_ticket(delay))
            .await?;
        tokio::time::sleep(delay).await;

        info!(channel = %message.channel_id, "Closing ticket channel");
        gateway.delete_channel(message.channel_id).await
    }

    async fn generate_reply(&self, text: &str, display_name: &str) -> String {
        let prompt = ai::build_prompt(&self.settings.system_prompt, display_name, text);
        match self.generator.generate(&prompt).await {
            Ok(raw) => ai::fit_reply(&raw, self.settings.max_reply_chars),
            Err(e) => {
                error!(error = %e, "Error generating AI response");
                replies::GENERATION_FAILED.to_string()
            }
        }
    }
}

fn outcome_text_for_command(outcome: Outcome, author: UserId, prefix: &str) -> String {
    replies::outcome_text(outcome, author, CountSource::Command(prefix)).unwrap_or_default()
}

/// A trimmed, non-empty body made only of ASCII digits.
fn is_digit_only(content: &str) -> bool {
    let content = content.trim();
    !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit())
}

/// Remove the bot's mention tokens (`<@id>` and `<@!id>`) and trim.
fn strip_mention(content: &str, bot: UserId) -> String {
    content
        .replace(&format!("<@{bot}>"), "")
        .replace(&format!("<@!{bot}>"), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_mention() {
        let bot = UserId(99);
        assert_eq!(strip_mention("<@99> hello", bot), "hello");
        assert_eq!(strip_mention("hey <@!99>  ", bot), "hey");
        assert_eq!(strip_mention("<@99>", bot), "");
        assert_eq!(strip_mention("<@12> hi", bot), "<@12> hi");
    }

    #[test]
    fn test_digit_only() {
        assert!(is_digit_only(" 12 "));
        assert!(is_digit_only("99999999999999999999999"));
        assert!(!is_digit_only("12a"));
        assert!(!is_digit_only(""));
    }

    #[test]
    fn test_settings_from_config() {
        let config = BotConfig::default();
        let settings = DispatchSettings::from(&config);
        assert_eq!(settings.prefix, "!");
        assert_eq!(settings.max_reply_chars, 2000);
        assert_eq!(settings.invite_timeout, Duration::from_secs(604_800));
        assert_eq!(settings.ticket_category, "Support Tickets");
    }
}
