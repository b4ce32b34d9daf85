//! Process-wide bot state, built once at startup and shared by handle.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::counting::{CountingGame, GameState, Outcome};
use crate::ratelimit::{Quota, RateLimiter};
use crate::types::{ChannelId, GuildId, UserId};

/// Owns the rate limiter and the counting games.
///
/// Nothing here is persisted; all state is lost on restart.
pub struct BotState<C: Clock = SystemClock> {
    limiter: RateLimiter<C>,
    games: CountingGame,
}

impl BotState<SystemClock> {
    pub fn new(quota: Quota) -> Arc<Self> {
        Arc::new(Self::with_clock(quota, SystemClock))
    }
}

impl<C: Clock> BotState<C> {
    pub fn with_clock(quota: Quota, clock: C) -> Self {
        Self {
            limiter: RateLimiter::with_clock(quota, clock),
            games: CountingGame::new(),
        }
    }

    /// See [`RateLimiter::is_rate_limited`].
    pub fn is_rate_limited(&self, actor: UserId) -> bool {
        self.limiter.is_rate_limited(actor)
    }

    /// See [`CountingGame::submit`].
    pub fn submit(
        &self,
        guild: GuildId,
        actor: UserId,
        channel: ChannelId,
        text: &str,
    ) -> Option<Outcome> {
        self.games.submit(guild, actor, channel, text)
    }

    pub fn game_status(&self, guild: GuildId) -> Option<GameState> {
        self.games.status(guild)
    }

    pub fn reset_game(&self, guild: GuildId) -> bool {
        self.games.reset(guild)
    }

    pub fn limiter(&self) -> &RateLimiter<C> {
        &self.limiter
    }

    pub fn games(&self) -> &CountingGame {
        &self.games
    }
}
