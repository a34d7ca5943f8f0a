use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::{CourseId, ReviewId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReviewError {
    #[error("rating must be between 1 and 5 stars, got {0}")]
    InvalidRating(u8),
}

//
// ─── RATING ───────────────────────────────────────────────────────────────────
//

/// Star rating, one to five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Best first, the order pickers and breakdowns list them in.
    pub const ALL: [Rating; 5] = [Rating(5), Rating(4), Rating(3), Rating(2), Rating(1)];

    /// # Errors
    ///
    /// Returns `ReviewError::InvalidRating` outside `1..=5`.
    pub fn new(stars: u8) -> Result<Self, ReviewError> {
        if (1..=5).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(ReviewError::InvalidRating(stars))
        }
    }

    /// Round a score as the API may send it (`"4"`, `4.6`). `None` when it
    /// does not land on a star.
    #[must_use]
    pub fn from_score(score: f64) -> Option<Self> {
        if !score.is_finite() {
            return None;
        }
        let rounded = score.round();
        if (1.0..=5.0).contains(&rounded) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(Self(rounded as u8))
        } else {
            None
        }
    }

    #[must_use]
    pub fn stars(self) -> u8 {
        self.0
    }

    /// `"1 star"`, `"4 stars"`.
    #[must_use]
    pub fn label(self) -> String {
        if self.0 == 1 {
            "1 star".to_owned()
        } else {
            format!("{} stars", self.0)
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

//
// ─── REVIEWS ──────────────────────────────────────────────────────────────────
//

/// What a student submits when posting or editing a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: Rating,
    pub text: Option<String>,
}

impl ReviewDraft {
    /// Blank text means a rating without a written review.
    #[must_use]
    pub fn new(rating: Rating, text: &str) -> Self {
        let text = text.trim();
        Self {
            rating,
            text: (!text.is_empty()).then(|| text.to_owned()),
        }
    }
}

/// A posted review.
///
/// Course fields are filled on "my reviews" listings, author fields on a
/// course's public listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub course_id: CourseId,
    pub rating: Rating,
    pub text: Option<String>,
    pub author: Option<String>,
    pub course_title: Option<String>,
    pub course_image: Option<Url>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or("Anonymous")
    }

    /// Take over an edit.
    pub fn apply(&mut self, draft: &ReviewDraft) {
        self.rating = draft.rating;
        self.text.clone_from(&draft.text);
    }
}

/// Aggregate of a course's reviews.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    total: u32,
    star_sum: u32,
    counts: [u32; 5],
}

impl RatingSummary {
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut summary = Self::default();
        for review in reviews {
            let stars = review.rating.stars();
            summary.total += 1;
            summary.star_sum += u32::from(stars);
            summary.counts[usize::from(stars - 1)] += 1;
        }
        summary
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Mean rating; `None` without reviews.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.star_sum) / f64::from(self.total))
    }

    #[must_use]
    pub fn count(&self, rating: Rating) -> u32 {
        self.counts[usize::from(rating.stars() - 1)]
    }

    /// Share of reviews with this rating, rounded to a whole percent.
    #[must_use]
    pub fn percent(&self, rating: Rating) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let share = f64::from(self.count(rating)) * 100.0 / f64::from(self.total);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = share.round() as u32;
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, stars: u8) -> Review {
        Review {
            id: ReviewId::new(id).unwrap(),
            course_id: CourseId::new("c1").unwrap(),
            rating: Rating::new(stars).unwrap(),
            text: None,
            author: None,
            course_title: None,
            course_image: None,
            created_at: None,
        }
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(3).unwrap().label(), "3 stars");
        assert_eq!(Rating::new(1).unwrap().label(), "1 star");
    }

    #[test]
    fn api_scores_round_to_stars() {
        assert_eq!(Rating::from_score(4.6), Some(Rating::new(5).unwrap()));
        assert_eq!(Rating::from_score(1.2), Some(Rating::new(1).unwrap()));
        assert_eq!(Rating::from_score(0.2), None);
        assert_eq!(Rating::from_score(f64::NAN), None);
    }

    #[test]
    fn blank_text_is_dropped() {
        let draft = ReviewDraft::new(Rating::default(), "   ");
        assert_eq!(draft.text, None);
        let draft = ReviewDraft::new(Rating::default(), " Great pacing ");
        assert_eq!(draft.text.as_deref(), Some("Great pacing"));
    }

    #[test]
    fn summary_counts_and_averages() {
        let reviews = [review("a", 5), review("b", 4), review("c", 5), review("d", 1)];
        let summary = RatingSummary::from_reviews(&reviews);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.average(), Some(3.75));
        assert_eq!(summary.count(Rating::new(5).unwrap()), 2);
        assert_eq!(summary.percent(Rating::new(5).unwrap()), 50);
        assert_eq!(summary.percent(Rating::new(2).unwrap()), 0);
    }

    #[test]
    fn empty_summary_has_no_average() {
        let summary = RatingSummary::from_reviews(&[]);
        assert_eq!(summary.average(), None);
        assert_eq!(summary.percent(Rating::default()), 0);
    }

    #[test]
    fn edits_replace_rating_and_text() {
        let mut posted = review("a", 2);
        posted.apply(&ReviewDraft::new(Rating::new(4).unwrap(), "Better on rewatch"));
        assert_eq!(posted.rating.stars(), 4);
        assert_eq!(posted.text.as_deref(), Some("Better on rewatch"));
        assert_eq!(posted.author_name(), "Anonymous");
    }
}
