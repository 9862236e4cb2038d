use super::view::{AlertViewModel, QuizResultsViewModel, QuizStepViewModel};

/// Output boundary of the quiz controller.
///
/// Every call is made from the controller's event loop, one at a time.
pub trait QuizPresenter: Send + Sync {
    fn render_question(&self, step: &QuizStepViewModel);

    fn render_answer_highlight(&self, is_correct: bool);

    fn render_results(&self, results: &QuizResultsViewModel, message: &str);

    fn render_error(&self, alert: &AlertViewModel);

    fn set_input_enabled(&self, enabled: bool);

    fn show_loading_indicator(&self);

    fn hide_loading_indicator(&self);
}
