use serde::{Deserialize, Serialize};

use crate::model::GameResult;

/// Cross-session totals and the best game so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateStatistics {
    correct_answers_total: u64,
    questions_total: u64,
    games_count: u64,
    best_game: GameResult,
}

impl AggregateStatistics {
    /// Rehydrate statistics from persisted storage.
    #[must_use]
    pub fn from_persisted(
        correct_answers_total: u64,
        questions_total: u64,
        games_count: u64,
        best_game: GameResult,
    ) -> Self {
        Self {
            correct_answers_total,
            questions_total,
            games_count,
            best_game,
        }
    }

    #[must_use]
    pub fn correct_answers_total(&self) -> u64 {
        self.correct_answers_total
    }

    #[must_use]
    pub fn questions_total(&self) -> u64 {
        self.questions_total
    }

    #[must_use]
    pub fn games_count(&self) -> u64 {
        self.games_count
    }

    #[must_use]
    pub fn best_game(&self) -> GameResult {
        self.best_game
    }

    /// Percentage of correct answers over every stored game, `0.0` before any game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_accuracy(&self) -> f64 {
        if self.questions_total == 0 {
            return 0.0;
        }
        self.correct_answers_total as f64 / self.questions_total as f64 * 100.0
    }

    /// Returns the statistics after folding in one finished game.
    ///
    /// The best game is replaced only when `game` is strictly better.
    #[must_use]
    pub fn record(&self, game: GameResult) -> Self {
        let best_game = if game.is_better_than(&self.best_game) {
            game
        } else {
            self.best_game
        };
        Self {
            correct_answers_total: self
                .correct_answers_total
                .saturating_add(u64::from(game.correct())),
            questions_total: self.questions_total.saturating_add(u64::from(game.total())),
            games_count: self.games_count.saturating_add(1),
            best_game,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn empty_statistics_have_zero_accuracy() {
        let stats = AggregateStatistics::default();
        assert!(stats.total_accuracy().abs() < f64::EPSILON);
        assert_eq!(stats.best_game(), GameResult::none());
    }

    #[test]
    fn record_accumulates_totals_and_keeps_best() {
        let now = fixed_now();
        let stats = AggregateStatistics::default()
            .record(GameResult::new(7, 10, now).unwrap())
            .record(GameResult::new(5, 10, now + Duration::minutes(1)).unwrap());

        assert_eq!(stats.games_count(), 2);
        assert_eq!(stats.correct_answers_total(), 12);
        assert_eq!(stats.questions_total(), 20);
        assert_eq!(stats.best_game().correct(), 7);
        assert!((stats.total_accuracy() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_identical_score_keeps_first_holder() {
        let first = GameResult::new(7, 10, fixed_now()).unwrap();
        let second = GameResult::new(7, 10, fixed_now() + Duration::hours(1)).unwrap();
        let stats = AggregateStatistics::default().record(first).record(second);
        assert_eq!(stats.best_game(), first);
    }
}
