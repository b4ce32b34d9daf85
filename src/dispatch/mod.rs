//! Inbound event routing, independent of the chat platform.

mod dispatcher;
mod event;
mod gateway;
pub mod replies;

pub use dispatcher::{DispatchSettings, Dispatcher};
pub use event::{Author, ComponentPress, InboundMessage, InteractionRef, MessageRef};
pub use gateway::{ChannelTopic, Embed, Gateway, Reaction, TicketChannel};
