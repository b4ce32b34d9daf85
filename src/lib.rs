//! Tallybot - Discord AI chat, counting game and support ticket bot
//!
//! This crate implements a Discord bot that relays mentions to a generative
//! language API behind a per-user sliding-window rate limit, runs a per-guild
//! counting game, times out members who post invite links, and opens private
//! support ticket channels from a button panel. All state lives in memory.

pub mod ai;
pub mod clock;
pub mod config;
pub mod counting;
pub mod discord;
pub mod dispatch;
pub mod error;
pub mod moderation;
pub mod ratelimit;
pub mod store;
pub mod tickets;
pub mod types;
