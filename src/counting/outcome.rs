//! Results of a counting-game submission.

/// The tagged result of one submission.
///
/// A double post and a wrong number are both rejections, but only the wrong
/// number resets the game, so they are kept as separate variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `1` was submitted with no game running (or right after a reset).
    Started,
    /// The expected next number was submitted by a different actor.
    Accepted(u64),
    /// No game exists for the guild and the number was not `1`.
    RejectedNotStartedAtOne,
    /// The actor who made the last accepted count tried again. State is untouched.
    RejectedDoublePost,
    /// The number was not `current + 1`. The game has been reset.
    RejectedWrongNumber { expected: u64, got: u64 },
}

impl Outcome {
    /// Whether the submission advanced or started the game.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Started | Outcome::Accepted(_))
    }

    /// The number now standing in the game, when the submission succeeded.
    pub fn counted(&self) -> Option<u64> {
        match self {
            Outcome::Started => Some(1),
            Outcome::Accepted(n) => Some(*n),
            _ => None,
        }
    }
}

/// Celebration tier for an accepted count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Milestone {
    /// Every 10th or 25th count
    Nice,
    /// Every 50th count
    Great,
    /// Every 100th count
    Huge,
}

impl Milestone {
    /// Classify an accepted number. The highest matching tier wins.
    pub fn classify(number: u64) -> Option<Self> {
        if number == 0 {
            return None;
        }
        if number % 100 == 0 {
            Some(Milestone::Huge)
        } else if number % 50 == 0 {
            Some(Milestone::Great)
        } else if number % 25 == 0 || number % 10 == 0 {
            Some(Milestone::Nice)
        } else {
            None
        }
    }
}
