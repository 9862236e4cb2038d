//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::GameResultError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors raised while loading the movie catalog.
///
/// These only ever surface during the catalog load phase; per-question
/// failures degrade instead of erroring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog address is invalid")]
    InvalidSourceAddress,
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("catalog response could not be decoded")]
    DecodingFailure,
    #[error("catalog server responded with status {0}")]
    ServerFailure(u16),
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("catalog provider rejected the request: {0}")]
    Rejected(String),
}

impl CatalogError {
    /// Text suitable for showing to the player.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidSourceAddress => {
                "Unable to load data. Check the server address.".to_string()
            }
            Self::NetworkFailure(reason) => format!("Network error: {reason}"),
            Self::DecodingFailure => "Could not process the data from the server.".to_string(),
            Self::ServerFailure(code) => format!("Server error: {code}"),
            Self::EmptyCatalog => "The server returned no movies.".to_string(),
            Self::Rejected(message) => format!("The server refused the request: {message}"),
        }
    }
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error("invalid persisted value for {key}: {raw}")]
    InvalidValue { key: &'static str, raw: String },
    #[error(transparent)]
    GameResult(#[from] GameResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A question source name other than `fixed` or `remote`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown question source `{0}` (expected `fixed` or `remote`)")]
pub struct UnknownSourceKind(pub String);
