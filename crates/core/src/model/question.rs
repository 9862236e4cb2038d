use std::fmt;

/// Poster shown alongside a question.
///
/// Pre-authored questions reference a bundled asset by name; catalog-backed
/// questions carry the downloaded bytes, which may be empty when the download
/// failed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ImagePayload {
    Asset(String),
    Bytes(Vec<u8>),
}

impl ImagePayload {
    #[must_use]
    pub fn empty() -> Self {
        Self::Bytes(Vec::new())
    }

    /// Returns true when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Asset(name) => name.is_empty(),
            Self::Bytes(bytes) => bytes.is_empty(),
        }
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(name) => write!(f, "Asset({name})"),
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// A single yes/no quiz question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    image: ImagePayload,
    text: String,
    correct_answer: bool,
}

impl Question {
    #[must_use]
    pub fn new(image: ImagePayload, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image,
            text: text.into(),
            correct_answer,
        }
    }

    #[must_use]
    pub fn image(&self) -> &ImagePayload {
        &self.image
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    /// Returns true if `given` matches the expected answer.
    #[must_use]
    pub fn is_correct(&self, given: bool) -> bool {
        given == self.correct_answer
    }
}
