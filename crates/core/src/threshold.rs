use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{ImagePayload, Question};

//
// ─── DIRECTION ─────────────────────────────────────────────────────────────────
//

/// Which side of the threshold the question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdDirection {
    Greater,
    Less,
}

impl ThresholdDirection {
    /// Pick a direction with equal probability.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::Greater
        } else {
            Self::Less
        }
    }

    /// Closed interval the threshold is drawn from for a given rating.
    ///
    /// The bands shift with the rating so that "yes" and "no" stay roughly
    /// equally likely across the catalog.
    #[must_use]
    pub fn range_for(self, rating: f64) -> RangeInclusive<u8> {
        match self {
            Self::Greater => {
                if rating > 8.5 {
                    8..=9
                } else if rating > 7.5 {
                    7..=9
                } else if rating > 6.5 {
                    6..=8
                } else {
                    4..=6
                }
            }
            Self::Less => {
                if rating > 8.5 {
                    5..=7
                } else if rating > 7.5 {
                    6..=8
                } else if rating > 6.5 {
                    7..=9
                } else {
                    8..=10
                }
            }
        }
    }
}

impl fmt::Display for ThresholdDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greater => f.write_str("greater"),
            Self::Less => f.write_str("less"),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A rating comparison against an integer threshold.
///
/// # Examples
///
/// ```
/// # use quiz_core::threshold::{ThresholdDirection, ThresholdQuestion};
/// let q = ThresholdQuestion::new(ThresholdDirection::Greater, 8, 9.0);
/// assert!(q.correct_answer());
/// assert_eq!(q.prompt(), "Is this movie's rating greater than 8?");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdQuestion {
    direction: ThresholdDirection,
    threshold: u8,
    rating: f64,
}

impl ThresholdQuestion {
    /// Build a question for an already drawn threshold.
    ///
    /// The expected answer depends only on `direction`, `threshold`, and `rating`.
    #[must_use]
    pub fn new(direction: ThresholdDirection, threshold: u8, rating: f64) -> Self {
        Self {
            direction,
            threshold,
            rating,
        }
    }

    /// Draw a direction and a threshold for `rating`.
    pub fn generate<R: Rng>(rating: f64, rng: &mut R) -> Self {
        let direction = ThresholdDirection::random(rng);
        Self::generate_with_direction(direction, rating, rng)
    }

    /// Draw a threshold for a fixed direction.
    pub fn generate_with_direction<R: Rng>(
        direction: ThresholdDirection,
        rating: f64,
        rng: &mut R,
    ) -> Self {
        let threshold = rng.random_range(direction.range_for(rating));
        Self::new(direction, threshold, rating)
    }

    #[must_use]
    pub fn direction(&self) -> ThresholdDirection {
        self.direction
    }

    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        let threshold = f64::from(self.threshold);
        match self.direction {
            ThresholdDirection::Greater => self.rating > threshold,
            ThresholdDirection::Less => self.rating < threshold,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Is this movie's rating {} than {}?",
            self.direction, self.threshold
        )
    }

    /// Turn the comparison into a quiz question showing `image`.
    #[must_use]
    pub fn into_question(self, image: ImagePayload) -> Question {
        Question::new(image, self.prompt(), self.correct_answer())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn drawn_thresholds(direction: ThresholdDirection, rating: f64) -> BTreeSet<u8> {
        let mut rng = StdRng::seed_from_u64(7);
        (0..400)
            .map(|_| {
                ThresholdQuestion::generate_with_direction(direction, rating, &mut rng).threshold()
            })
            .collect()
    }

    #[test]
    fn greater_bands_follow_rating() {
        assert_eq!(drawn_thresholds(ThresholdDirection::Greater, 9.0), BTreeSet::from([8, 9]));
        assert_eq!(drawn_thresholds(ThresholdDirection::Greater, 8.0), BTreeSet::from([7, 8, 9]));
        assert_eq!(drawn_thresholds(ThresholdDirection::Greater, 7.0), BTreeSet::from([6, 7, 8]));
        assert_eq!(drawn_thresholds(ThresholdDirection::Greater, 5.5), BTreeSet::from([4, 5, 6]));
    }

    #[test]
    fn less_bands_mirror_greater_bands() {
        assert_eq!(drawn_thresholds(ThresholdDirection::Less, 9.0), BTreeSet::from([5, 6, 7]));
        assert_eq!(drawn_thresholds(ThresholdDirection::Less, 8.0), BTreeSet::from([6, 7, 8]));
        assert_eq!(drawn_thresholds(ThresholdDirection::Less, 7.0), BTreeSet::from([7, 8, 9]));
        assert_eq!(drawn_thresholds(ThresholdDirection::Less, 5.5), BTreeSet::from([8, 9, 10]));
    }

    #[test]
    fn band_edges_are_exclusive_on_the_rating() {
        assert_eq!(ThresholdDirection::Greater.range_for(8.5), 7..=9);
        assert_eq!(ThresholdDirection::Greater.range_for(7.5), 6..=8);
        assert_eq!(ThresholdDirection::Greater.range_for(6.5), 4..=6);
        assert_eq!(ThresholdDirection::Less.range_for(8.5), 6..=8);
        assert_eq!(ThresholdDirection::Less.range_for(6.5), 8..=10);
    }

    #[test]
    fn answer_is_determined_by_drawn_threshold() {
        let at_eight = ThresholdQuestion::new(ThresholdDirection::Greater, 8, 9.0);
        let at_nine = ThresholdQuestion::new(ThresholdDirection::Greater, 9, 9.0);
        assert!(at_eight.correct_answer());
        assert!(!at_nine.correct_answer());

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let q = ThresholdQuestion::generate_with_direction(
                ThresholdDirection::Greater,
                9.0,
                &mut rng,
            );
            assert_eq!(q.correct_answer(), q.threshold() == 8);
        }
    }

    #[test]
    fn less_compares_strictly() {
        assert!(!ThresholdQuestion::new(ThresholdDirection::Less, 7, 7.0).correct_answer());
        assert!(ThresholdQuestion::new(ThresholdDirection::Less, 8, 7.9).correct_answer());
    }

    #[test]
    fn both_directions_are_drawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let directions: BTreeSet<_> = (0..200)
            .map(|_| ThresholdQuestion::generate(7.0, &mut rng).direction())
            .map(|direction| direction == ThresholdDirection::Greater)
            .collect();
        assert_eq!(directions.len(), 2);
    }

    #[test]
    fn question_carries_prompt_and_answer() {
        let q = ThresholdQuestion::new(ThresholdDirection::Less, 6, 5.2)
            .into_question(ImagePayload::empty());
        assert_eq!(q.text(), "Is this movie's rating less than 6?");
        assert!(q.correct_answer());
        assert!(q.image().is_empty());
    }
}
