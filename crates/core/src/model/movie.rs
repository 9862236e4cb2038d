use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const RESIZED_POSTER_SUFFIX: &str = "._V0_UX600_.jpg";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RatingError {
    #[error("rating is empty")]
    Empty,

    #[error("rating is not a number: {raw}")]
    NotANumber { raw: String },
}

/// One catalog entry as delivered by the catalog provider.
///
/// The rating stays a string until a question is built from it; the provider
/// sends it that way and some entries carry no usable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    title: String,
    rating: String,
    image_ref: String,
}

impl Movie {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        rating: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            rating: rating.into(),
            image_ref: image_ref.into(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn rating_raw(&self) -> &str {
        &self.rating
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    /// Parse the rating as a number.
    ///
    /// # Errors
    ///
    /// Returns `RatingError` if the raw value is blank or not a finite number.
    pub fn rating(&self) -> Result<f64, RatingError> {
        let raw = self.rating.trim();
        if raw.is_empty() {
            return Err(RatingError::Empty);
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(RatingError::NotANumber {
                raw: raw.to_string(),
            }),
        }
    }

    /// URL of the 600px-wide poster variant.
    ///
    /// Poster URLs look like `https://host/images/M/<id>._V1_Ratio0.6716_AL_.jpg`;
    /// everything from the first `._` onward is the size modifier.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the resulting string is not a valid URL.
    pub fn resized_image_url(&self) -> Result<Url, url::ParseError> {
        let base = self
            .image_ref
            .split_once("._")
            .map_or(self.image_ref.as_str(), |(head, _)| head);
        Url::parse(&format!("{base}{RESIZED_POSTER_SUFFIX}"))
    }
}
