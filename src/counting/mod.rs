//! Collaborative counting game.
//!
//! Members of a guild count upward one message at a time. The same member may
//! not count twice in a row, and a wrong number resets the game.

mod game;
mod outcome;

pub use game::{parse_count, CountingGame, GameState};
pub use outcome::{Milestone, Outcome};
