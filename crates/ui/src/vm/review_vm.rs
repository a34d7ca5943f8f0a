use skillforge_core::model::{Payment, Rating, RatingSummary, Review};

use crate::vm::time_fmt::format_price;

/// Reviews shown under "Student feedback" on a course page.
pub const FEEDBACK_PREVIEW: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewCardVm {
    pub id: String,
    pub author: String,
    pub course_id: String,
    pub course_title: String,
    pub stars: String,
    pub rating: u8,
    pub text: Option<String>,
    pub posted_on: Option<String>,
}

impl ReviewCardVm {
    #[must_use]
    pub fn from_review(review: &Review) -> Self {
        Self {
            id: review.id.as_str().to_owned(),
            author: review.author_name().to_owned(),
            course_id: review.course_id.as_str().to_owned(),
            course_title: review
                .course_title
                .clone()
                .unwrap_or_else(|| review.course_id.as_str().to_owned()),
            stars: star_glyphs(review.rating),
            rating: review.rating.stars(),
            text: review.text.clone(),
            posted_on: review
                .created_at
                .map(|at| at.format("%b %-d, %Y").to_string()),
        }
    }
}

/// `★★★★☆` for four stars.
#[must_use]
pub fn star_glyphs(rating: Rating) -> String {
    let filled = usize::from(rating.stars());
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[must_use]
pub fn map_review_cards(reviews: &[Review], limit: Option<usize>) -> Vec<ReviewCardVm> {
    reviews
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(ReviewCardVm::from_review)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatingRowVm {
    pub label: String,
    pub count: u32,
    pub percent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatingSummaryVm {
    /// One decimal, `"–"` without reviews.
    pub average: String,
    pub total_label: String,
    pub rows: Vec<RatingRowVm>,
}

impl RatingSummaryVm {
    #[must_use]
    pub fn new(summary: &RatingSummary) -> Self {
        let total = summary.total();
        Self {
            average: summary
                .average()
                .map_or_else(|| "–".to_owned(), |avg| format!("{avg:.1}")),
            total_label: if total == 1 {
                "1 rating".to_owned()
            } else {
                format!("{total} ratings")
            },
            rows: Rating::ALL
                .iter()
                .map(|rating| RatingRowVm {
                    label: rating.label(),
                    count: summary.count(*rating),
                    percent: summary.percent(*rating),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatingOptionVm {
    pub value: u8,
    pub label: String,
    pub selected: bool,
}

/// Options for a rating select, five stars first.
#[must_use]
pub fn rating_options(selected: u8) -> Vec<RatingOptionVm> {
    Rating::ALL
        .iter()
        .map(|rating| RatingOptionVm {
            value: rating.stars(),
            label: rating.label(),
            selected: rating.stars() == selected,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrolledCourseVm {
    pub course_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub paid_label: String,
}

#[must_use]
pub fn map_enrolled_courses(payments: &[Payment]) -> Vec<EnrolledCourseVm> {
    payments
        .iter()
        .map(|payment| EnrolledCourseVm {
            course_id: payment.course_id.as_str().to_owned(),
            title: payment.course_label().to_owned(),
            image_url: payment.course_image.as_ref().map(ToString::to_string),
            paid_label: format!("Paid: {}", format_price(payment.amount)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use skillforge_core::model::{CourseId, ReviewId};

    fn review(id: &str, stars: u8) -> Review {
        Review {
            id: ReviewId::new(id).unwrap(),
            course_id: CourseId::new("rust-101").unwrap(),
            rating: Rating::new(stars).unwrap(),
            text: None,
            author: None,
            course_title: None,
            course_image: None,
            created_at: None,
        }
    }

    #[test]
    fn breakdown_lists_five_stars_first() {
        let reviews = [review("a", 5), review("b", 4), review("c", 4)];
        let vm = RatingSummaryVm::new(&RatingSummary::from_reviews(&reviews));
        assert_eq!(vm.average, "4.3");
        assert_eq!(vm.total_label, "3 ratings");
        assert_eq!(vm.rows.len(), 5);
        assert_eq!(vm.rows[0].label, "5 stars");
        assert_eq!(vm.rows[1].percent, 67);
        assert_eq!(vm.rows[4].label, "1 star");
    }

    #[test]
    fn no_reviews_has_no_average() {
        let vm = RatingSummaryVm::new(&RatingSummary::default());
        assert_eq!(vm.average, "–");
        assert_eq!(vm.total_label, "0 ratings");
    }

    #[test]
    fn feedback_preview_is_capped() {
        let reviews: Vec<_> = (0..6).map(|i| review(&format!("r{i}"), 5)).collect();
        assert_eq!(map_review_cards(&reviews, Some(FEEDBACK_PREVIEW)).len(), 4);
        assert_eq!(map_review_cards(&reviews, None).len(), 6);
    }

    #[test]
    fn card_shows_stars_and_date() {
        let mut posted = review("a", 3);
        posted.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        let card = ReviewCardVm::from_review(&posted);
        assert_eq!(card.stars, "★★★☆☆");
        assert_eq!(card.author, "Anonymous");
        assert_eq!(card.course_title, "rust-101");
        assert_eq!(card.posted_on.as_deref(), Some("Mar 1, 2024"));
    }

    #[test]
    fn rating_select_marks_the_choice() {
        let options = rating_options(4);
        assert_eq!(options[0].label, "5 stars");
        assert!(options[1].selected);
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn free_enrollment_reads_as_free() {
        let payments = [Payment {
            id: "p1".into(),
            course_id: CourseId::new("rust-101").unwrap(),
            amount: Some(0.0),
            course_title: Some("Rust from Scratch".into()),
            course_image: None,
        }];
        let cards = map_enrolled_courses(&payments);
        assert_eq!(cards[0].paid_label, "Paid: Free");
        assert_eq!(cards[0].title, "Rust from Scratch");
    }
}
