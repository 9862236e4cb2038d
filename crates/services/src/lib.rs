#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod questions;
pub mod quiz;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use app_services::{AppServices, SourceKind};
pub use error::{AppServicesError, CatalogError, StatisticsError};
pub use questions::{
    FixedQuestionSet, QuestionOutcome, QuestionSource, RemoteMovieQuestionGenerator,
};
pub use quiz::{QuizConfig, QuizController, QuizHandle, QuizPhase, QuizPresenter};
pub use statistics_service::{StatisticsService, StoreOutcome};
