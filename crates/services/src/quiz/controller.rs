use std::sync::Arc;

use quiz_core::model::{AggregateStatistics, Question};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::config::QuizConfig;
use super::presenter::QuizPresenter;
use super::view::{AlertViewModel, QuizResultsViewModel, QuizStepViewModel, results_message};
use crate::error::CatalogError;
use crate::questions::{QuestionOutcome, QuestionSource};
use crate::statistics_service::{StatisticsService, StoreOutcome};

const STALLED_MESSAGE: &str = "Could not prepare the next question.";

/// Where the controller is in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    LoadingCatalog,
    AwaitingQuestion,
    AwaitingAnswer,
    Evaluating,
    Finished,
    LoadFailed,
    /// The source kept failing to produce a question.
    Stalled,
}

impl QuizPhase {
    /// Phases from which a new round may be started.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::LoadFailed | Self::Stalled)
    }
}

/// Messages drained by the controller's event loop.
#[derive(Debug)]
pub(crate) enum QuizEvent {
    CatalogLoaded {
        generation: u64,
        result: Result<(), CatalogError>,
    },
    QuestionDelivered {
        generation: u64,
        outcome: QuestionOutcome,
    },
    Answer(bool),
    AdvanceDue {
        generation: u64,
    },
    Retry,
    Shutdown,
}

#[derive(Debug, Default)]
struct SessionState {
    current_index: usize,
    score: usize,
    input_locked: bool,
    current_question: Option<Question>,
    skipped_in_a_row: usize,
}

/// Input side of the quiz screen. Cheap to clone; every call is queued
/// onto the controller's event loop.
#[derive(Debug, Clone)]
pub struct QuizHandle {
    events: UnboundedSender<QuizEvent>,
}

impl QuizHandle {
    pub fn on_yes_tapped(&self) {
        self.send(QuizEvent::Answer(true));
    }

    pub fn on_no_tapped(&self) {
        self.send(QuizEvent::Answer(false));
    }

    pub fn on_retry_tapped(&self) {
        self.send(QuizEvent::Retry);
    }

    /// Stop the event loop after the events already queued.
    pub fn shutdown(&self) {
        self.send(QuizEvent::Shutdown);
    }

    fn send(&self, event: QuizEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("quiz controller is gone; input dropped");
        }
    }
}

/// Drives one quiz round at a time.
///
/// All session state lives here and is only touched from the event loop.
/// Background work (catalog load, question fetch, pacing timer) reports back
/// through the channel tagged with the generation it was started under; a
/// message from an older generation is dropped.
pub struct QuizController {
    source: Arc<dyn QuestionSource>,
    statistics: Arc<StatisticsService>,
    presenter: Arc<dyn QuizPresenter>,
    config: QuizConfig,
    total_questions: usize,
    phase: QuizPhase,
    state: SessionState,
    generation: u64,
    events_tx: UnboundedSender<QuizEvent>,
    events_rx: UnboundedReceiver<QuizEvent>,
}

impl QuizController {
    #[must_use]
    pub fn new(
        source: Arc<dyn QuestionSource>,
        statistics: Arc<StatisticsService>,
        presenter: Arc<dyn QuizPresenter>,
        config: QuizConfig,
    ) -> Self {
        let mut total_questions = config.total_questions.max(1);
        if let Some(capacity) = source.capacity() {
            total_questions = total_questions.min(capacity.max(1));
        }
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            statistics,
            presenter,
            config,
            total_questions,
            phase: QuizPhase::Idle,
            state: SessionState::default(),
            generation: 0,
            events_tx,
            events_rx,
        }
    }

    #[must_use]
    pub fn handle(&self) -> QuizHandle {
        QuizHandle {
            events: self.events_tx.clone(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.state.score
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_input_locked(&self) -> bool {
        self.state.input_locked
    }

    /// Start a round and process events until `QuizHandle::shutdown`.
    pub async fn run(mut self) {
        self.start_session();
        while self.process_next().await {}
        tracing::debug!("quiz controller stopped");
    }

    /// Handle one queued event. Returns `false` once the loop should stop.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.handle_event(event).await,
            None => false,
        }
    }

    /// Reset the session and begin fetching the first question.
    pub fn start_session(&mut self) {
        self.generation += 1;
        self.state = SessionState {
            input_locked: true,
            ..SessionState::default()
        };
        self.source.reset();
        self.presenter.set_input_enabled(false);
        self.presenter.show_loading_indicator();
        tracing::info!(
            generation = self.generation,
            total = self.total_questions,
            "starting quiz session"
        );

        if self.source.requires_catalog() {
            self.load_catalog();
        } else {
            self.request_question();
        }
    }

    /// Start over after a finished, failed, or stalled round.
    pub fn restart(&mut self) {
        if !self.phase.is_terminal() {
            tracing::debug!(phase = ?self.phase, "ignoring restart mid-round");
            return;
        }
        self.start_session();
    }

    pub(crate) async fn handle_event(&mut self, event: QuizEvent) -> bool {
        match event {
            QuizEvent::CatalogLoaded { generation, result } => {
                if self.is_stale(generation, QuizPhase::LoadingCatalog) {
                    return true;
                }
                self.on_catalog_loaded(result);
            }
            QuizEvent::QuestionDelivered {
                generation,
                outcome,
            } => {
                if self.is_stale(generation, QuizPhase::AwaitingQuestion) {
                    return true;
                }
                self.on_question_outcome(outcome);
            }
            QuizEvent::Answer(given) => self.on_answer(given),
            QuizEvent::AdvanceDue { generation } => {
                if self.is_stale(generation, QuizPhase::Evaluating) {
                    return true;
                }
                self.advance().await;
            }
            QuizEvent::Retry => self.restart(),
            QuizEvent::Shutdown => return false,
        }
        true
    }

    fn is_stale(&self, generation: u64, expected: QuizPhase) -> bool {
        if generation != self.generation || self.phase != expected {
            tracing::debug!(
                generation,
                current = self.generation,
                phase = ?self.phase,
                "dropping stale event"
            );
            return true;
        }
        false
    }

    fn load_catalog(&mut self) {
        self.phase = QuizPhase::LoadingCatalog;
        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = source.load_catalog().await;
            let _ = events.send(QuizEvent::CatalogLoaded { generation, result });
        });
    }

    fn on_catalog_loaded(&mut self, result: Result<(), CatalogError>) {
        match result {
            Ok(()) => self.request_question(),
            Err(err) => {
                tracing::warn!(%err, "catalog load failed");
                self.phase = QuizPhase::LoadFailed;
                self.presenter.hide_loading_indicator();
                self.presenter
                    .render_error(&AlertViewModel::error(err.user_message()));
            }
        }
    }

    fn request_question(&mut self) {
        self.phase = QuizPhase::AwaitingQuestion;
        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = source.request_next_question().await;
            let _ = events.send(QuizEvent::QuestionDelivered {
                generation,
                outcome,
            });
        });
    }

    fn on_question_outcome(&mut self, outcome: QuestionOutcome) {
        match outcome {
            QuestionOutcome::Ready(question) => {
                self.state.skipped_in_a_row = 0;
                self.on_question_received(question);
            }
            QuestionOutcome::Skipped => {
                self.state.skipped_in_a_row += 1;
                if self.state.skipped_in_a_row >= self.config.max_skipped_requests {
                    self.stall("too many unusable catalog entries");
                } else {
                    self.request_question();
                }
            }
            QuestionOutcome::Exhausted => self.stall("question source exhausted"),
        }
    }

    fn stall(&mut self, reason: &'static str) {
        tracing::warn!(
            reason,
            index = self.state.current_index,
            "quiz session stalled"
        );
        self.phase = QuizPhase::Stalled;
        self.presenter.hide_loading_indicator();
        self.presenter
            .render_error(&AlertViewModel::error(STALLED_MESSAGE));
    }

    fn on_question_received(&mut self, question: Question) {
        let step = QuizStepViewModel::from_question(
            &question,
            self.state.current_index,
            self.total_questions,
        );
        self.state.current_question = Some(question);
        self.phase = QuizPhase::AwaitingAnswer;
        self.presenter.hide_loading_indicator();
        self.presenter.render_question(&step);
        self.state.input_locked = false;
        self.presenter.set_input_enabled(true);
    }

    fn on_answer(&mut self, given: bool) {
        if self.state.input_locked || self.phase != QuizPhase::AwaitingAnswer {
            tracing::debug!(phase = ?self.phase, "ignoring answer while input is locked");
            return;
        }
        let Some(is_correct) = self
            .state
            .current_question
            .as_ref()
            .map(|question| question.is_correct(given))
        else {
            return;
        };

        self.state.input_locked = true;
        self.presenter.set_input_enabled(false);

        if is_correct {
            self.state.score += 1;
        }
        self.presenter.render_answer_highlight(is_correct);
        self.phase = QuizPhase::Evaluating;

        let events = self.events_tx.clone();
        let generation = self.generation;
        let pacing = self.config.pacing;
        tokio::spawn(async move {
            tokio::time::sleep(pacing).await;
            let _ = events.send(QuizEvent::AdvanceDue { generation });
        });
    }

    async fn advance(&mut self) {
        self.state.current_question = None;
        if self.state.current_index + 1 >= self.total_questions {
            self.finalize().await;
        } else {
            self.state.current_index += 1;
            self.presenter.show_loading_indicator();
            self.request_question();
        }
    }

    async fn finalize(&mut self) {
        let total = self.total_questions;
        let correct = self.state.score.min(total);

        let stats = match self
            .statistics
            .store(to_i64(correct), to_i64(total))
            .await
        {
            Ok(StoreOutcome::Recorded { statistics, .. }) => statistics,
            Ok(StoreOutcome::Rejected) => {
                tracing::warn!(correct, total, "game result rejected by statistics store");
                self.fallback_statistics().await
            }
            Err(err) => {
                tracing::error!(%err, "failed to store game result");
                self.fallback_statistics().await
            }
        };

        self.phase = QuizPhase::Finished;
        tracing::info!(correct, total, "quiz session finished");
        let message = results_message(correct, total, &stats);
        self.presenter
            .render_results(&QuizResultsViewModel::new(correct, total), &message);
    }

    async fn fallback_statistics(&self) -> AggregateStatistics {
        self.statistics.snapshot().await.unwrap_or_else(|err| {
            tracing::error!(%err, "failed to load statistics");
            AggregateStatistics::default()
        })
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
