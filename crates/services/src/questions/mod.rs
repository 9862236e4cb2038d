//! Question sources feeding the quiz controller.

mod fixed;
mod remote;

use async_trait::async_trait;
use quiz_core::model::Question;

use crate::error::CatalogError;

pub use fixed::{FixedQuestionSet, builtin_questions};
pub use remote::RemoteMovieQuestionGenerator;

/// What a single question request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    Ready(Question),
    /// Nothing left to ask (or nothing loaded yet).
    Exhausted,
    /// The picked entry could not be turned into a question; asking again may succeed.
    Skipped,
}

/// Supplies questions to a quiz session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Whether `load_catalog` must complete before the first request.
    fn requires_catalog(&self) -> bool {
        false
    }

    /// Fetch whatever backing data the source needs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the catalog cannot be fetched or is unusable.
    async fn load_catalog(&self) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn request_next_question(&self) -> QuestionOutcome;

    /// Forget which questions were asked in the current playthrough.
    fn reset(&self);

    /// Number of distinct questions this source can hand out per playthrough,
    /// or `None` when it never runs dry.
    fn capacity(&self) -> Option<usize> {
        None
    }
}
