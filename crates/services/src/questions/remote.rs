use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use quiz_core::model::{ImagePayload, Movie};
use quiz_core::threshold::ThresholdQuestion;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use super::{QuestionOutcome, QuestionSource};
use crate::catalog::CatalogProvider;
use crate::error::CatalogError;

/// Builds rating-threshold questions from a remotely fetched movie catalog.
///
/// Movies are drawn uniformly with replacement, so the same title may come
/// up more than once in a round.
pub struct RemoteMovieQuestionGenerator {
    provider: Arc<dyn CatalogProvider>,
    catalog: Mutex<Vec<Movie>>,
    rng: Mutex<StdRng>,
}

impl RemoteMovieQuestionGenerator {
    #[must_use]
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self::with_rng(provider, StdRng::from_rng(&mut rand::rng()))
    }

    #[must_use]
    pub fn with_seed(provider: Arc<dyn CatalogProvider>, seed: u64) -> Self {
        Self::with_rng(provider, StdRng::seed_from_u64(seed))
    }

    fn with_rng(provider: Arc<dyn CatalogProvider>, rng: StdRng) -> Self {
        Self {
            provider,
            catalog: Mutex::new(Vec::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Number of movies currently loaded.
    #[must_use]
    pub fn catalog_len(&self) -> usize {
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn pick_movie(&self) -> Option<Movie> {
        let catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        catalog.choose(&mut *rng).cloned()
    }

    fn draw_threshold(&self, rating: f64) -> ThresholdQuestion {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        ThresholdQuestion::generate(rating, &mut *rng)
    }
}

#[async_trait]
impl QuestionSource for RemoteMovieQuestionGenerator {
    fn requires_catalog(&self) -> bool {
        true
    }

    async fn load_catalog(&self) -> Result<(), CatalogError> {
        let movies = self.provider.fetch_catalog().await?;
        if movies.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        tracing::info!(count = movies.len(), "movie catalog loaded");
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = movies;
        Ok(())
    }

    async fn request_next_question(&self) -> QuestionOutcome {
        let Some(movie) = self.pick_movie() else {
            return QuestionOutcome::Exhausted;
        };

        let rating = match movie.rating() {
            Ok(rating) => rating,
            Err(err) => {
                tracing::warn!(title = movie.title(), %err, "skipping movie without a usable rating");
                return QuestionOutcome::Skipped;
            }
        };
        let threshold = self.draw_threshold(rating);

        let image = match self.provider.fetch_image(&movie).await {
            Ok(bytes) => ImagePayload::Bytes(bytes),
            Err(err) => {
                tracing::warn!(title = movie.title(), %err, "poster download failed");
                ImagePayload::empty()
            }
        };

        QuestionOutcome::Ready(threshold.into_question(image))
    }

    /// Draws are with replacement; there is nothing to forget.
    fn reset(&self) {}
}
