use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::Movie;
use quiz_core::time::fixed_clock;
use services::catalog::CatalogProvider;
use services::quiz::{AlertViewModel, QuizResultsViewModel, QuizStepViewModel};
use services::{
    CatalogError, FixedQuestionSet, QuizConfig, QuizController, QuizPresenter,
    RemoteMovieQuestionGenerator, StatisticsService,
};
use storage::repository::{InMemoryRepository, KeyValueStore};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
enum Screen {
    Question(QuizStepViewModel),
    Highlight(bool),
    Results(QuizResultsViewModel, String),
    Error(AlertViewModel),
}

/// Forwards the renders a player would see; input and spinner toggles are skipped.
struct ChannelPresenter(UnboundedSender<Screen>);

impl QuizPresenter for ChannelPresenter {
    fn render_question(&self, step: &QuizStepViewModel) {
        let _ = self.0.send(Screen::Question(step.clone()));
    }

    fn render_answer_highlight(&self, is_correct: bool) {
        let _ = self.0.send(Screen::Highlight(is_correct));
    }

    fn render_results(&self, results: &QuizResultsViewModel, message: &str) {
        let _ = self.0.send(Screen::Results(results.clone(), message.to_string()));
    }

    fn render_error(&self, alert: &AlertViewModel) {
        let _ = self.0.send(Screen::Error(alert.clone()));
    }

    fn set_input_enabled(&self, _enabled: bool) {}

    fn show_loading_indicator(&self) {}

    fn hide_loading_indicator(&self) {}
}

fn presenter() -> (Arc<ChannelPresenter>, UnboundedReceiver<Screen>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelPresenter(tx)), rx)
}

async fn next_screen(rx: &mut UnboundedReceiver<Screen>) -> Screen {
    tokio::time::timeout(Duration::from_secs(30), rx.recv())
        .await
        .expect("controller went quiet")
        .expect("presenter channel closed")
}

#[tokio::test(start_paused = true)]
async fn fixed_round_persists_statistics_and_restarts() {
    let repo = InMemoryRepository::new();
    let statistics = Arc::new(StatisticsService::new(fixed_clock(), Arc::new(repo.clone())));
    let source = Arc::new(FixedQuestionSet::with_seed(
        services::questions::builtin_questions(),
        7,
    ));
    let (presenter, mut screens) = presenter();
    let controller = QuizController::new(
        source,
        Arc::clone(&statistics),
        presenter,
        QuizConfig::default(),
    );
    let handle = controller.handle();
    let running = tokio::spawn(controller.run());

    let mut highlights = 0;
    let mut correct = 0;
    for expected in 1..=10 {
        let Screen::Question(step) = next_screen(&mut screens).await else {
            panic!("expected question {expected}");
        };
        assert_eq!(step.question_number, format!("{expected}/10"));
        assert_eq!(step.question, "Is this movie's rating greater than 6?");

        handle.on_yes_tapped();
        handle.on_no_tapped();
        let Screen::Highlight(is_correct) = next_screen(&mut screens).await else {
            panic!("expected a highlight");
        };
        highlights += 1;
        if is_correct {
            correct += 1;
        }
    }
    assert_eq!(highlights, 10);
    assert_eq!(correct, 6);

    let Screen::Results(results, message) = next_screen(&mut screens).await else {
        panic!("expected results");
    };
    assert_eq!(results.text, "Your result: 6/10");
    assert!(message.contains("Quizzes played: 1"));
    assert!(message.contains("Record: 6/10"));
    assert!(message.contains("Average accuracy: 60.00%"));
    assert_eq!(
        repo.get("stats.games_count").await.unwrap().as_deref(),
        Some("1")
    );

    handle.on_retry_tapped();
    let Screen::Question(step) = next_screen(&mut screens).await else {
        panic!("expected a fresh round");
    };
    assert_eq!(step.question_number, "1/10");

    handle.shutdown();
    running.await.unwrap();
}

struct StaticCatalog(Vec<Movie>);

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Movie>, CatalogError> {
        if self.0.is_empty() {
            return Err(CatalogError::NetworkFailure("offline".into()));
        }
        Ok(self.0.clone())
    }

    async fn fetch_image(&self, _movie: &Movie) -> Result<Vec<u8>, CatalogError> {
        Err(CatalogError::NetworkFailure("offline".into()))
    }
}

#[tokio::test(start_paused = true)]
async fn remote_round_asks_threshold_questions() {
    let statistics = Arc::new(StatisticsService::new(
        fixed_clock(),
        Arc::new(InMemoryRepository::new()),
    ));
    let provider = Arc::new(StaticCatalog(vec![
        Movie::new("Inception (2010)", "8.8", "https://img/inception._V1_.jpg"),
        Movie::new("Unrated (2024)", "", "https://img/unrated._V1_.jpg"),
    ]));
    let source = Arc::new(RemoteMovieQuestionGenerator::with_seed(provider, 21));
    let (presenter, mut screens) = presenter();
    let controller = QuizController::new(
        source,
        statistics,
        presenter,
        QuizConfig::default().with_total_questions(3),
    );
    let handle = controller.handle();
    let running = tokio::spawn(controller.run());

    for _ in 0..3 {
        let Screen::Question(step) = next_screen(&mut screens).await else {
            panic!("expected a question");
        };
        assert!(step.image.is_empty());
        assert!(
            step.question.starts_with("Is this movie's rating greater than")
                || step.question.starts_with("Is this movie's rating less than")
        );
        handle.on_yes_tapped();
        assert!(matches!(next_screen(&mut screens).await, Screen::Highlight(_)));
    }
    assert!(matches!(next_screen(&mut screens).await, Screen::Results(..)));

    handle.shutdown();
    running.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn unreachable_catalog_shows_retryable_error() {
    let statistics = Arc::new(StatisticsService::new(
        fixed_clock(),
        Arc::new(InMemoryRepository::new()),
    ));
    let source = Arc::new(RemoteMovieQuestionGenerator::new(Arc::new(StaticCatalog(
        Vec::new(),
    ))));
    let (presenter, mut screens) = presenter();
    let controller = QuizController::new(source, statistics, presenter, QuizConfig::default());
    let handle = controller.handle();
    let running = tokio::spawn(controller.run());

    let Screen::Error(alert) = next_screen(&mut screens).await else {
        panic!("expected an error alert");
    };
    assert_eq!(alert.title, "Error");
    assert_eq!(alert.message, "Network error: offline");

    handle.on_retry_tapped();
    assert!(matches!(next_screen(&mut screens).await, Screen::Error(_)));

    handle.shutdown();
    running.await.unwrap();
}
