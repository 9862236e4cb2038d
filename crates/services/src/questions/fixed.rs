use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use quiz_core::model::{ImagePayload, Question};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use super::{QuestionOutcome, QuestionSource};

const BUILTIN_PROMPT: &str = "Is this movie's rating greater than 6?";

const BUILTIN_MOVIES: [(&str, bool); 10] = [
    ("The Godfather", true),
    ("The Dark Knight", true),
    ("Kill Bill", true),
    ("The Avengers", true),
    ("Deadpool", true),
    ("The Green Knight", true),
    ("Old", false),
    ("The Ice Age Adventures of Buck Wild", false),
    ("Tesla", false),
    ("Vivarium", false),
];

/// A finite list of pre-authored questions, each asked at most once per playthrough.
pub struct FixedQuestionSet {
    questions: Vec<Question>,
    used: Mutex<HashSet<usize>>,
    rng: Mutex<StdRng>,
}

impl FixedQuestionSet {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self::with_rng(questions, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic draw order, for tests.
    #[must_use]
    pub fn with_seed(questions: Vec<Question>, seed: u64) -> Self {
        Self::with_rng(questions, StdRng::seed_from_u64(seed))
    }

    fn with_rng(questions: Vec<Question>, rng: StdRng) -> Self {
        Self {
            questions,
            used: Mutex::new(HashSet::new()),
            rng: Mutex::new(rng),
        }
    }

    /// The ten bundled poster questions.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_questions())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn draw(&self) -> Option<Question> {
        let mut used = self.used.lock().unwrap_or_else(PoisonError::into_inner);
        let available: Vec<usize> = (0..self.questions.len())
            .filter(|idx| !used.contains(idx))
            .collect();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let idx = *available.choose(&mut *rng)?;
        used.insert(idx);
        Some(self.questions[idx].clone())
    }
}

#[async_trait]
impl QuestionSource for FixedQuestionSet {
    async fn request_next_question(&self) -> QuestionOutcome {
        match self.draw() {
            Some(question) => QuestionOutcome::Ready(question),
            None => QuestionOutcome::Exhausted,
        }
    }

    fn reset(&self) {
        self.used
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.questions.len())
    }
}

/// Questions for the bundled posters; the image payload is the asset name.
#[must_use]
pub fn builtin_questions() -> Vec<Question> {
    BUILTIN_MOVIES
        .iter()
        .map(|(title, answer)| {
            Question::new(ImagePayload::Asset((*title).to_string()), BUILTIN_PROMPT, *answer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hands_out_every_question_once_then_runs_dry() {
        let set = FixedQuestionSet::with_seed(builtin_questions(), 11);
        let mut seen = HashSet::new();
        for _ in 0..10 {
            match set.request_next_question().await {
                QuestionOutcome::Ready(q) => assert!(seen.insert(q), "question repeated"),
                other => panic!("expected a question, got {other:?}"),
            }
        }
        assert_eq!(seen.len(), 10);
        assert_eq!(set.request_next_question().await, QuestionOutcome::Exhausted);
    }

    #[tokio::test]
    async fn reset_makes_all_questions_eligible_again() {
        let set = FixedQuestionSet::with_seed(builtin_questions(), 5);
        for _ in 0..10 {
            let _ = set.request_next_question().await;
        }
        set.reset();

        let mut seen = HashSet::new();
        for _ in 0..10 {
            if let QuestionOutcome::Ready(q) = set.request_next_question().await {
                seen.insert(q);
            }
        }
        assert_eq!(seen.len(), 10);
    }

    #[tokio::test]
    async fn empty_set_is_exhausted_immediately() {
        let set = FixedQuestionSet::new(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.capacity(), Some(0));
        assert_eq!(set.request_next_question().await, QuestionOutcome::Exhausted);
    }

    #[test]
    fn builtin_set_matches_bundled_posters() {
        let set = FixedQuestionSet::builtin();
        assert_eq!(set.len(), 10);
        assert!(!set.requires_catalog());
        let yes = builtin_questions()
            .iter()
            .filter(|q| q.correct_answer())
            .count();
        assert_eq!(yes, 6);
    }
}
