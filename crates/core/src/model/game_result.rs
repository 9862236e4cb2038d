use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("a game must have at least one question")]
    NoQuestions,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Outcome of one finished quiz round.
///
/// Results form a total order where the greater value is the better game:
/// more correct answers first, then more questions, then the *earlier*
/// timestamp. The last rule keeps the current record holder in place when an
/// identical score is stored again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl GameResult {
    /// Build a result for a finished round.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::NoQuestions` for an empty round and
    /// `GameResultError::CorrectExceedsTotal` when the counts are inconsistent.
    pub fn new(correct: u32, total: u32, date: DateTime<Utc>) -> Result<Self, GameResultError> {
        if total == 0 {
            return Err(GameResultError::NoQuestions);
        }
        Self::from_persisted(correct, total, date)
    }

    /// Rehydrate a result from storage. Unlike `new`, this accepts the
    /// zero-question placeholder written before any game was played.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::CorrectExceedsTotal` when the counts are inconsistent.
    pub fn from_persisted(
        correct: u32,
        total: u32,
        date: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if correct > total {
            return Err(GameResultError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self {
            correct,
            total,
            date,
        })
    }

    /// Placeholder record reported before any game has been stored.
    #[must_use]
    pub fn none() -> Self {
        Self {
            correct: 0,
            total: 0,
            date: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns true if no game has produced this record yet.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.total == 0
    }

    /// Strict comparison: equal results are never better than each other.
    #[must_use]
    pub fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }
}

impl Default for GameResult {
    fn default() -> Self {
        Self::none()
    }
}

impl Ord for GameResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.correct
            .cmp(&other.correct)
            .then_with(|| self.total.cmp(&other.total))
            .then_with(|| other.date.cmp(&self.date))
    }
}

impl PartialOrd for GameResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
