//! Serenity event handler that feeds the dispatcher.

use serenity::all::{
    ActivityData, ComponentInteraction, Context, EventHandler, Interaction, Message, Ready, User,
};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use super::gateway::SerenityGateway;
use crate::dispatch::{Author, ComponentPress, Dispatcher, InboundMessage, InteractionRef};
use crate::types::{ChannelId, GuildId, MessageId, UserId};

const ACTIVITY: &str = "your messages | Type a message to chat!";

pub struct Handler {
    dispatcher: Arc<Dispatcher>,
}

impl Handler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

fn author(user: &User, nick: Option<&str>) -> Author {
    Author {
        id: UserId(user.id.get()),
        name: user.name.clone(),
        display_name: nick.unwrap_or_else(|| user.display_name()).to_string(),
        bot: user.bot,
    }
}

fn inbound_message(msg: &Message, bot_id: UserId) -> InboundMessage {
    let nick = msg.member.as_ref().and_then(|m| m.nick.as_deref());
    InboundMessage {
        id: MessageId(msg.id.get()),
        channel_id: ChannelId(msg.channel_id.get()),
        guild_id: msg.guild_id.map(|g| GuildId(g.get())),
        author: author(&msg.author, nick),
        content: msg.content.clone(),
        mentions_bot: msg.mentions.iter().any(|u| u.id.get() == bot_id.get()),
    }
}

fn component_press(component: &ComponentInteraction) -> ComponentPress {
    ComponentPress {
        interaction: InteractionRef {
            id: component.id.get(),
            token: component.token.clone(),
        },
        custom_id: component.data.custom_id.clone(),
        guild_id: component.guild_id.map(|g| GuildId(g.get())),
        channel_id: ChannelId(component.channel_id.get()),
        user: author(&component.user, None),
    }
}

fn current_bot_id(ctx: &Context) -> UserId {
    UserId(ctx.cache.current_user().id.get())
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
        ctx.set_activity(Some(ActivityData::listening(ACTIVITY)));
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let bot_id = current_bot_id(&ctx);
        let inbound = inbound_message(&msg, bot_id);
        let gateway = SerenityGateway::new(ctx, bot_id);

        if let Err(e) = self.dispatcher.handle_message(&gateway, &inbound).await {
            error!(message = %inbound.id, error = %e, "Failed to handle message");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Component(component) = interaction else {
            return;
        };

        let bot_id = current_bot_id(&ctx);
        let press = component_press(&component);
        let gateway = SerenityGateway::new(ctx, bot_id);

        if let Err(e) = self.dispatcher.handle_component(&gateway, &press).await {
            error!(custom_id = %press.custom_id, error = %e, "Failed to handle button press");
        }
    }
}
