//! Discord adapter built on serenity.

mod gateway;
mod handler;

pub use gateway::SerenityGateway;
pub use handler::Handler;

use serenity::all::GatewayIntents;

/// Gateway intents the bot subscribes to.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
}
