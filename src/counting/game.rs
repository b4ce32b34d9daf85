//! Per-guild counting game state machine.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, trace};

use super::outcome::Outcome;
use crate::types::{ChannelId, GuildId, UserId};

/// State of a running game in one guild.
///
/// `current == 0` means the game was just reset and the next `1` starts it again.
/// In that state `last_actor` is always `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    /// Last accepted count
    pub current: u64,
    /// Author of `current`
    pub last_actor: Option<UserId>,
    /// Channel the game was started in. Informational only: counts from any
    /// channel of the guild are accepted.
    pub channel: ChannelId,
}

impl GameState {
    fn started(actor: UserId, channel: ChannelId) -> Self {
        Self {
            current: 1,
            last_actor: Some(actor),
            channel,
        }
    }

    /// The number the next submission must carry.
    pub fn expected(&self) -> u64 {
        self.current.saturating_add(1)
    }

    fn reset(&mut self) {
        self.current = 0;
        self.last_actor = None;
    }
}

/// Parse a digit-only message body.
///
/// Anything else (signs, inner whitespace, overflow) yields `None`.
pub fn parse_count(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Counting games for every guild.
///
/// A guild entry is created by its first `1` and only removed by [`reset`].
/// Each submission is a single read-modify-write under the guild's entry lock.
///
/// [`reset`]: CountingGame::reset
#[derive(Default)]
pub struct CountingGame {
    games: DashMap<GuildId, GameState>,
}

impl CountingGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a message body for `guild`.
    ///
    /// Returns `None` when `text` is not a number; nothing is changed in that case.
    pub fn submit(
        &self,
        guild: GuildId,
        actor: UserId,
        channel: ChannelId,
        text: &str,
    ) -> Option<Outcome> {
        let Some(number) = parse_count(text) else {
            trace!(guild = %guild, "Ignoring non-numeric submission");
            return None;
        };

        let outcome = match self.games.entry(guild) {
            Entry::Vacant(slot) => {
                if number == 1 {
                    slot.insert(GameState::started(actor, channel));
                    Outcome::Started
                } else {
                    Outcome::RejectedNotStartedAtOne
                }
            }
            Entry::Occupied(mut slot) => advance(slot.get_mut(), actor, channel, number),
        };

        match outcome {
            Outcome::Started => {
                info!(guild = %guild, user = %actor, channel = %channel, "Counting game started")
            }
            Outcome::RejectedWrongNumber { expected, got } => info!(
                guild = %guild,
                user = %actor,
                expected,
                got,
                "Wrong number, counting game reset"
            ),
            _ => debug!(guild = %guild, user = %actor, number, ?outcome, "Count submitted"),
        }

        Some(outcome)
    }

    /// Snapshot of the guild's game, if one exists.
    pub fn status(&self, guild: GuildId) -> Option<GameState> {
        self.games.get(&guild).map(|state| *state)
    }

    /// Remove the guild's game entirely. Returns `false` if there was none.
    pub fn reset(&self, guild: GuildId) -> bool {
        let removed = self.games.remove(&guild).is_some();
        if removed {
            info!(guild = %guild, "Counting game removed");
        }
        removed
    }

    /// Number of guilds with a game entry.
    pub fn guild_count(&self) -> usize {
        self.games.len()
    }
}

fn advance(state: &mut GameState, actor: UserId, channel: ChannelId, number: u64) -> Outcome {
    if state.last_actor == Some(actor) {
        return Outcome::RejectedDoublePost;
    }

    if state.current == 0 && number == 1 {
        *state = GameState::started(actor, channel);
        return Outcome::Started;
    }

    let expected = state.expected();
    if number != expected {
        state.reset();
        return Outcome::RejectedWrongNumber {
            expected,
            got: number,
        };
    }

    state.current = number;
    state.last_actor = Some(actor);
    Outcome::Accepted(number)
}
