//! The quiz session state machine and its presentation boundary.

mod config;
mod controller;
mod presenter;
mod view;

pub use config::QuizConfig;
pub use controller::{QuizController, QuizHandle, QuizPhase};
pub use presenter::QuizPresenter;
pub use view::{AlertViewModel, QuizResultsViewModel, QuizStepViewModel, results_message};
