use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog::{CatalogConfig, HttpCatalogProvider};
use crate::error::{AppServicesError, UnknownSourceKind};
use crate::questions::{FixedQuestionSet, QuestionSource, RemoteMovieQuestionGenerator};
use crate::quiz::{QuizConfig, QuizController, QuizPresenter};
use crate::statistics_service::StatisticsService;

/// Which question source a quiz round draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// The ten bundled poster questions.
    Fixed,
    /// Threshold questions built from the online movie catalog.
    #[default]
    Remote,
}

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "remote" => Ok(Self::Remote),
            other => Err(UnknownSourceKind(other.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.write_str("fixed"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// Assembles the statistics store and question source for the app.
#[derive(Clone)]
pub struct AppServices {
    statistics: Arc<StatisticsService>,
    source: Arc<dyn QuestionSource>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage or the HTTP client cannot be initialized.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        source: SourceKind,
        catalog: CatalogConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, source, catalog)
    }

    /// Build services with statistics kept in memory only.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be initialized.
    pub fn in_memory(
        clock: Clock,
        source: SourceKind,
        catalog: CatalogConfig,
    ) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock, source, catalog)
    }

    fn from_storage(
        storage: &Storage,
        clock: Clock,
        source: SourceKind,
        catalog: CatalogConfig,
    ) -> Result<Self, AppServicesError> {
        let statistics = Arc::new(StatisticsService::new(
            clock,
            Arc::clone(&storage.key_values),
        ));
        let source: Arc<dyn QuestionSource> = match source {
            SourceKind::Fixed => Arc::new(FixedQuestionSet::builtin()),
            SourceKind::Remote => {
                tracing::debug!(url = %catalog.url, "using remote movie catalog");
                let provider = HttpCatalogProvider::new(catalog)?;
                Arc::new(RemoteMovieQuestionGenerator::new(Arc::new(provider)))
            }
        };
        Ok(Self { statistics, source })
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn source(&self) -> Arc<dyn QuestionSource> {
        Arc::clone(&self.source)
    }

    /// Wire a controller to `presenter`.
    #[must_use]
    pub fn quiz_controller(
        &self,
        presenter: Arc<dyn QuizPresenter>,
        config: QuizConfig,
    ) -> QuizController {
        QuizController::new(self.source(), self.statistics(), presenter, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;

    #[test]
    fn source_kind_parses_case_insensitively() {
        assert_eq!("Fixed".parse::<SourceKind>(), Ok(SourceKind::Fixed));
        assert_eq!(" remote ".parse::<SourceKind>(), Ok(SourceKind::Remote));
        assert_eq!(
            "imdb".parse::<SourceKind>(),
            Err(UnknownSourceKind("imdb".into()))
        );
        assert_eq!(SourceKind::default(), SourceKind::Remote);
    }

    #[test]
    fn fixed_source_is_wired_without_catalog() {
        let services =
            AppServices::in_memory(fixed_clock(), SourceKind::Fixed, CatalogConfig::default())
                .unwrap();
        let source = services.source();
        assert!(!source.requires_catalog());
        assert_eq!(source.capacity(), Some(10));
    }

    #[test]
    fn remote_source_requires_catalog() {
        let services =
            AppServices::in_memory(fixed_clock(), SourceKind::Remote, CatalogConfig::default())
                .unwrap();
        assert!(services.source().requires_catalog());
    }

    #[tokio::test]
    async fn sqlite_memory_backend_starts_empty() {
        let services = AppServices::new_sqlite(
            "sqlite:file:memdb_app_services?mode=memory&cache=shared",
            fixed_clock(),
            SourceKind::Fixed,
            CatalogConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(services.statistics().games_count().await.unwrap(), 0);
    }
}
