//! `Gateway` implementation over serenity's HTTP client and cache.

use async_trait::async_trait;
use serenity::all::{
    ButtonStyle, ChannelId as DiscordChannelId, ChannelType, Context, CreateActionRow,
    CreateAllowedMentions, CreateButton, CreateChannel, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, EditMember,
    GuildId as DiscordGuildId, InteractionId, MessageId as DiscordMessageId, PermissionOverwrite,
    PermissionOverwriteType, Permissions, ReactionType, RoleId, UserId as DiscordUserId,
};
use std::time::Duration;

use crate::dispatch::{
    ChannelTopic, Embed, Gateway, InteractionRef, MessageRef, Reaction, TicketChannel,
};
use crate::error::{BotError, Result};
use crate::tickets::TicketKind;
use crate::types::{ChannelId, GuildId, UserId};

fn channel(id: ChannelId) -> DiscordChannelId {
    DiscordChannelId::new(id.get())
}

fn guild(id: GuildId) -> DiscordGuildId {
    DiscordGuildId::new(id.get())
}

fn user(id: UserId) -> DiscordUserId {
    DiscordUserId::new(id.get())
}

fn build_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new()
        .title(&embed.title)
        .description(&embed.description)
        .colour(embed.color);

    for (name, value, inline) in &embed.fields {
        builder = builder.field(name, value, *inline);
    }
    if let Some(footer) = &embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(url) = &embed.image_url {
        builder = builder.image(url);
    }
    builder
}

fn ticket_button(kind: TicketKind) -> CreateButton {
    let button = CreateButton::new(kind.custom_id()).label(kind.label());
    match kind {
        TicketKind::Partnership => button.style(ButtonStyle::Danger),
        TicketKind::Purchase => button.style(ButtonStyle::Primary).emoji('💰'),
        TicketKind::General => button.style(ButtonStyle::Success),
    }
}

/// Serenity-backed gateway scoped to one event's context.
pub struct SerenityGateway {
    ctx: Context,
    bot_id: UserId,
}

impl SerenityGateway {
    pub fn new(ctx: Context, bot_id: UserId) -> Self {
        Self { ctx, bot_id }
    }
}

#[async_trait]
impl Gateway for SerenityGateway {
    fn bot_id(&self) -> UserId {
        self.bot_id
    }

    async fn reply(&self, to: MessageRef, content: &str) -> Result<()> {
        let target = channel(to.channel);
        let builder = CreateMessage::new()
            .content(content)
            .reference_message((target, DiscordMessageId::new(to.message.get())))
            .allowed_mentions(CreateAllowedMentions::new().all_users(true).replied_user(false));

        target.send_message(&self.ctx, builder).await?;
        Ok(())
    }

    async fn send(&self, to: ChannelId, content: &str) -> Result<()> {
        channel(to).say(&self.ctx, content).await?;
        Ok(())
    }

    async fn send_embed(&self, to: ChannelId, embed: &Embed) -> Result<()> {
        let builder = CreateMessage::new().embed(build_embed(embed));
        channel(to).send_message(&self.ctx, builder).await?;
        Ok(())
    }

    async fn send_ticket_panel(
        &self,
        to: ChannelId,
        embed: &Embed,
        kinds: &[TicketKind],
    ) -> Result<()> {
        let buttons = kinds.iter().copied().map(ticket_button).collect();
        let builder = CreateMessage::new()
            .embed(build_embed(embed))
            .components(vec![CreateActionRow::Buttons(buttons)]);
        channel(to).send_message(&self.ctx, builder).await?;
        Ok(())
    }

    async fn react(&self, to: MessageRef, reaction: Reaction) -> Result<()> {
        channel(to.channel)
            .create_reaction(
                &self.ctx,
                DiscordMessageId::new(to.message.get()),
                ReactionType::Unicode(reaction.emoji().to_string()),
            )
            .await?;
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<()> {
        channel(message.channel)
            .delete_message(&self.ctx, DiscordMessageId::new(message.message.get()))
            .await?;
        Ok(())
    }

    async fn broadcast_typing(&self, to: ChannelId) -> Result<()> {
        channel(to).broadcast_typing(&self.ctx).await?;
        Ok(())
    }

    async fn is_admin(&self, guild_id: GuildId, user_id: UserId) -> Result<bool> {
        let guild_id = guild(guild_id);
        let member = guild_id.member(&self.ctx, user(user_id)).await?;

        let permissions = {
            let Some(cached) = guild_id.to_guild_cached(&self.ctx.cache) else {
                return Err(BotError::Delivery(format!("guild {guild_id} is not cached")));
            };
            cached.member_permissions(&member)
        };
        Ok(permissions.administrator())
    }

    async fn timeout_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<()> {
        let span = chrono::Duration::from_std(duration)
            .map_err(|e| BotError::Delivery(format!("invalid timeout: {e}")))?;
        let until = chrono::Utc::now() + span;

        let builder = EditMember::new()
            .disable_communication_until(until.to_rfc3339())
            .audit_log_reason(reason);
        guild(guild_id)
            .edit_member(&self.ctx, user(user_id), builder)
            .await?;
        Ok(())
    }

    async fn channel_topic(&self, id: ChannelId) -> Result<Option<String>> {
        let channel = channel(id).to_channel(&self.ctx).await?;
        Ok(channel.guild().and_then(|c| c.topic))
    }

    async fn guild_channel_topics(&self, guild_id: GuildId) -> Result<Vec<ChannelTopic>> {
        let channels = guild(guild_id).channels(&self.ctx).await?;
        Ok(channels
            .into_values()
            .filter(|c| c.kind == ChannelType::Text)
            .map(|c| ChannelTopic {
                id: ChannelId(c.id.get()),
                topic: c.topic,
            })
            .collect())
    }

    async fn ensure_category(&self, guild_id: GuildId, name: &str) -> Result<ChannelId> {
        let guild_id = guild(guild_id);
        let channels = guild_id.channels(&self.ctx).await?;
        if let Some(existing) = channels
            .values()
            .find(|c| c.kind == ChannelType::Category && c.name == name)
        {
            return Ok(ChannelId(existing.id.get()));
        }

        let created = guild_id
            .create_channel(&self.ctx, CreateChannel::new(name).kind(ChannelType::Category))
            .await?;
        Ok(ChannelId(created.id.get()))
    }

    async fn create_ticket_channel(
        &self,
        guild_id: GuildId,
        ticket: &TicketChannel,
    ) -> Result<ChannelId> {
        // The @everyone role shares the guild's id.
        let everyone = RoleId::new(guild_id.get());
        let overwrites = vec![
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
                kind: PermissionOverwriteType::Role(everyone),
            },
            PermissionOverwrite {
                allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(user(ticket.owner)),
            },
            PermissionOverwrite {
                allow: Permissions::VIEW_CHANNEL,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(user(self.bot_id)),
            },
        ];

        let builder = CreateChannel::new(&ticket.name)
            .kind(ChannelType::Text)
            .topic(&ticket.topic)
            .category(channel(ticket.category))
            .permissions(overwrites);
        let created = guild(guild_id).create_channel(&self.ctx, builder).await?;
        Ok(ChannelId(created.id.get()))
    }

    async fn delete_channel(&self, id: ChannelId) -> Result<()> {
        channel(id).delete(&self.ctx).await?;
        Ok(())
    }

    async fn respond_ephemeral(&self, interaction: &InteractionRef, content: &str) -> Result<()> {
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        );
        self.ctx
            .http
            .create_interaction_response(
                InteractionId::new(interaction.id),
                &interaction.token,
                &response,
                Vec::new(),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_conversion_keeps_value() {
        assert_eq!(channel(ChannelId(5)).get(), 5);
        assert_eq!(guild(GuildId(6)).get(), 6);
        assert_eq!(user(UserId(7)).get(), 7);
    }
}
