use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use quiz_core::model::ImagePayload;
use services::quiz::{AlertViewModel, QuizResultsViewModel, QuizStepViewModel};
use services::QuizPresenter;

/// Terminal rendering of the quiz screen on stdout.
#[derive(Default)]
pub struct ConsolePresenter {
    input_enabled: AtomicBool,
}

impl ConsolePresenter {
    fn print(&self, text: &str) {
        let mut out = io::stdout().lock();
        // stdout going away is not worth crashing the quiz over
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

fn describe_image(image: &ImagePayload) -> String {
    match image {
        _ if image.is_empty() => "[no poster]".to_string(),
        ImagePayload::Asset(name) => format!("[poster: {name}]"),
        ImagePayload::Bytes(bytes) => format!("[poster: {} bytes]", bytes.len()),
    }
}

impl QuizPresenter for ConsolePresenter {
    fn render_question(&self, step: &QuizStepViewModel) {
        self.print(&format!(
            "\nQuestion {}  {}\n{}",
            step.question_number,
            describe_image(&step.image),
            step.question
        ));
    }

    fn render_answer_highlight(&self, is_correct: bool) {
        self.print(if is_correct { "Correct!" } else { "Wrong." });
    }

    fn render_results(&self, results: &QuizResultsViewModel, message: &str) {
        self.print(&format!(
            "\n== {} ==\n{message}\n[r] {}  [q] quit",
            results.title, results.button_text
        ));
    }

    fn render_error(&self, alert: &AlertViewModel) {
        self.print(&format!(
            "\n== {} ==\n{}\n[r] {}  [q] quit",
            alert.title, alert.message, alert.button_text
        ));
    }

    fn set_input_enabled(&self, enabled: bool) {
        let was = self.input_enabled.swap(enabled, Ordering::SeqCst);
        if enabled && !was {
            self.print("[y] yes  [n] no");
        }
    }

    fn show_loading_indicator(&self) {
        self.print("Loading...");
    }

    fn hide_loading_indicator(&self) {}
}
