use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use quiz_core::model::{AggregateStatistics, GameResult};
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::StatisticsError;

const KEY_CORRECT_ANSWERS_TOTAL: &str = "stats.correct_answers_total";
const KEY_QUESTIONS_TOTAL: &str = "stats.questions_total";
const KEY_GAMES_COUNT: &str = "stats.games_count";
const KEY_BEST_CORRECT: &str = "stats.best_game.correct";
const KEY_BEST_TOTAL: &str = "stats.best_game.total";
const KEY_BEST_DATE: &str = "stats.best_game.date";

/// Result of a `StatisticsService::store` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Arguments were out of range; nothing changed.
    Rejected,
    Recorded {
        statistics: AggregateStatistics,
        new_best: bool,
    },
}

/// Persists and aggregates results across quiz rounds.
///
/// Statistics are read from the key/value store on first use and cached;
/// every update writes all fields in one batch and only then refreshes the
/// cache, so a failed write leaves both the store and the cache untouched.
pub struct StatisticsService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    cache: Mutex<Option<AggregateStatistics>>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            clock,
            store,
            cache: Mutex::new(None),
        }
    }

    /// Current statistics, loading them from storage on first access.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if storage cannot be read or holds malformed values.
    pub async fn snapshot(&self) -> Result<AggregateStatistics, StatisticsError> {
        let cached = *self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cached {
            return Ok(cached);
        }

        let loaded = self.load().await?;
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(loaded);
        Ok(loaded)
    }

    /// Record one finished round.
    ///
    /// Out-of-range arguments (`correct < 0`, `total <= 0`, `correct > total`)
    /// are ignored and reported as `StoreOutcome::Rejected`.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if storage cannot be read or written.
    pub async fn store(&self, correct: i64, total: i64) -> Result<StoreOutcome, StatisticsError> {
        let (Ok(correct), Ok(total)) = (u32::try_from(correct), u32::try_from(total)) else {
            tracing::debug!(correct, total, "ignoring out-of-range game result");
            return Ok(StoreOutcome::Rejected);
        };
        let Ok(game) = GameResult::new(correct, total, self.clock.now()) else {
            tracing::debug!(correct, total, "ignoring inconsistent game result");
            return Ok(StoreOutcome::Rejected);
        };

        let current = self.snapshot().await?;
        let new_best = game.is_better_than(&current.best_game());
        let updated = current.record(game);
        self.store.set_many(&entries(&updated)).await?;
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(updated);

        tracing::info!(
            correct,
            total,
            games = updated.games_count(),
            new_best,
            "stored game result"
        );
        Ok(StoreOutcome::Recorded {
            statistics: updated,
            new_best,
        })
    }

    /// Number of stored games.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if statistics cannot be loaded.
    pub async fn games_count(&self) -> Result<u64, StatisticsError> {
        Ok(self.snapshot().await?.games_count())
    }

    /// Best stored game, or the zero placeholder before any game.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if statistics cannot be loaded.
    pub async fn best_game(&self) -> Result<GameResult, StatisticsError> {
        Ok(self.snapshot().await?.best_game())
    }

    /// Accuracy over all stored games, in percent.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError` if statistics cannot be loaded.
    pub async fn total_accuracy(&self) -> Result<f64, StatisticsError> {
        Ok(self.snapshot().await?.total_accuracy())
    }

    async fn load(&self) -> Result<AggregateStatistics, StatisticsError> {
        let correct_answers_total = self.read_number(KEY_CORRECT_ANSWERS_TOTAL).await?;
        let questions_total = self.read_number(KEY_QUESTIONS_TOTAL).await?;
        let games_count = self.read_number(KEY_GAMES_COUNT).await?;

        let best_correct = self.read_number(KEY_BEST_CORRECT).await?;
        let best_total = self.read_number(KEY_BEST_TOTAL).await?;
        let best_game = match self.store.get(KEY_BEST_DATE).await? {
            Some(raw) => {
                let date = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|_| StatisticsError::InvalidValue {
                        key: KEY_BEST_DATE,
                        raw: raw.clone(),
                    })?
                    .with_timezone(&Utc);
                GameResult::from_persisted(best_correct, best_total, date)?
            }
            None => GameResult::none(),
        };

        tracing::debug!(games = games_count, "loaded statistics");
        Ok(AggregateStatistics::from_persisted(
            correct_answers_total,
            questions_total,
            games_count,
            best_game,
        ))
    }

    async fn read_number<T: FromStr + Default>(
        &self,
        key: &'static str,
    ) -> Result<T, StatisticsError> {
        match self.store.get(key).await? {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| StatisticsError::InvalidValue { key, raw }),
            None => Ok(T::default()),
        }
    }
}

fn entries(stats: &AggregateStatistics) -> Vec<(&'static str, String)> {
    let best = stats.best_game();
    vec![
        (
            KEY_CORRECT_ANSWERS_TOTAL,
            stats.correct_answers_total().to_string(),
        ),
        (KEY_QUESTIONS_TOTAL, stats.questions_total().to_string()),
        (KEY_GAMES_COUNT, stats.games_count().to_string()),
        (KEY_BEST_CORRECT, best.correct().to_string()),
        (KEY_BEST_TOTAL, best.total().to_string()),
        (KEY_BEST_DATE, best.date().to_rfc3339()),
    ]
}
