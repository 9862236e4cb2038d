use std::time::Duration;

const DEFAULT_TOTAL_QUESTIONS: usize = 10;
const DEFAULT_PACING: Duration = Duration::from_secs(1);
const DEFAULT_MAX_SKIPPED_REQUESTS: usize = 10;

/// Tunables for a quiz round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    /// Questions per round; never zero.
    pub total_questions: usize,
    /// Delay between an answer and the next question.
    pub pacing: Duration,
    /// Consecutive skipped requests tolerated before the round stalls.
    pub max_skipped_requests: usize,
}

impl QuizConfig {
    #[must_use]
    pub fn with_total_questions(mut self, total_questions: usize) -> Self {
        self.total_questions = total_questions.max(1);
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn with_max_skipped_requests(mut self, max_skipped_requests: usize) -> Self {
        self.max_skipped_requests = max_skipped_requests.max(1);
        self
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            total_questions: DEFAULT_TOTAL_QUESTIONS,
            pacing: DEFAULT_PACING,
            max_skipped_requests: DEFAULT_MAX_SKIPPED_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_standard_round() {
        let config = QuizConfig::default();
        assert_eq!(config.total_questions, 10);
        assert_eq!(config.pacing, Duration::from_secs(1));
        assert_eq!(config.max_skipped_requests, 10);
    }

    #[test]
    fn zero_counts_are_raised_to_one() {
        let config = QuizConfig::default()
            .with_total_questions(0)
            .with_max_skipped_requests(0);
        assert_eq!(config.total_questions, 1);
        assert_eq!(config.max_skipped_requests, 1);
    }
}
