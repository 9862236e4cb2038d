//! Presentation-facing view models for the quiz screen.

use quiz_core::model::{AggregateStatistics, ImagePayload, Question};

const ERROR_TITLE: &str = "Error";
const ERROR_BUTTON: &str = "Try again";
const RESULTS_TITLE: &str = "This round is over!";
const RESULTS_BUTTON: &str = "Play again";
const RECORD_DATE_FORMAT: &str = "%d.%m.%y %H:%M";

/// Everything needed to draw one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStepViewModel {
    pub image: ImagePayload,
    pub question: String,
    /// Position in the round, e.g. `"3/10"`.
    pub question_number: String,
}

impl QuizStepViewModel {
    /// Build the step for the question at zero-based `index` of `total`.
    #[must_use]
    pub fn from_question(question: &Question, index: usize, total: usize) -> Self {
        Self {
            image: question.image().clone(),
            question: question.text().to_string(),
            question_number: format!("{}/{total}", index + 1),
        }
    }
}

/// Summary shown when a round finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResultsViewModel {
    pub title: String,
    pub text: String,
    pub button_text: String,
}

impl QuizResultsViewModel {
    #[must_use]
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            title: RESULTS_TITLE.to_string(),
            text: format!("Your result: {correct}/{total}"),
            button_text: RESULTS_BUTTON.to_string(),
        }
    }
}

/// A blocking message with a single action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertViewModel {
    pub title: String,
    pub message: String,
    pub button_text: String,
}

impl AlertViewModel {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            message: message.into(),
            button_text: ERROR_BUTTON.to_string(),
        }
    }
}

/// Multi-line results text: this round, games played, record, and accuracy.
#[must_use]
pub fn results_message(correct: usize, total: usize, stats: &AggregateStatistics) -> String {
    let best = stats.best_game();
    format!(
        "Your result: {correct}/{total}\n\
         Quizzes played: {games}\n\
         Record: {best_correct}/{best_total} ({date})\n\
         Average accuracy: {accuracy:.2}%",
        games = stats.games_count(),
        best_correct = best.correct(),
        best_total = best.total(),
        date = best.date().format(RECORD_DATE_FORMAT),
        accuracy = stats.total_accuracy(),
    )
}
