//! Movie catalog provider contract and its HTTP implementation.

mod http;

use async_trait::async_trait;
use quiz_core::model::Movie;

use crate::error::CatalogError;

pub use http::{CatalogConfig, HttpCatalogProvider, decode_catalog};

/// Source of movies and their poster images.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the full list of candidate movies.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for transport, status, or decoding failures.
    async fn fetch_catalog(&self) -> Result<Vec<Movie>, CatalogError>;

    /// Download the poster for `movie`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the image cannot be downloaded.
    async fn fetch_image(&self, movie: &Movie) -> Result<Vec<u8>, CatalogError>;
}
