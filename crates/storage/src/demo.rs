//! Sample catalog for offline runs.

use skillforge_core::model::{
    Course, CourseId, Lecture, LectureId, Payment, Rating, Review, ReviewId, UserProfile,
    WatchProgress, WatchStatus,
};
use url::Url;

use crate::repository::{InMemoryRepository, StorageError};

pub const DEMO_EMAIL: &str = "demo@skillforge.local";
pub const DEMO_PASSWORD: &str = "demo";

const SAMPLE_VIDEO: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

struct DemoCourse {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    description: &'static str,
    instructor: &'static str,
    price: f64,
    lectures: &'static [(&'static str, &'static str, u32)],
}

const COURSES: &[DemoCourse] = &[
    DemoCourse {
        id: "rust-101",
        title: "Rust from Scratch",
        category: "Programming",
        description: "Ownership, borrowing and the standard library.",
        instructor: "Ferris Crab",
        price: 0.0,
        lectures: &[
            ("rust-101-1", "Hello, Cargo", 596),
            ("rust-101-2", "Ownership", 596),
            ("rust-101-3", "Traits and generics", 596),
        ],
    },
    DemoCourse {
        id: "watercolor",
        title: "Watercolor Basics",
        category: "\"Art\"",
        description: "Washes, glazes and wet-on-wet.",
        instructor: "Mira Lane",
        price: 19.0,
        lectures: &[
            ("watercolor-1", "Materials", 596),
            ("watercolor-2", "First wash", 596),
        ],
    },
];

const REVIEWS: &[(&str, &str, &str, u8, &str)] = &[
    ("demo-rev-1", "rust-101", "Sam Okafor", 5, "The ownership chapter finally made it click."),
    ("demo-rev-2", "rust-101", "Lena Ruiz", 4, ""),
    ("demo-rev-3", "watercolor", "Priya Nair", 5, "Gentle pace, lovely results."),
];

impl InMemoryRepository {
    /// In-memory store pre-filled with a small catalog, a few reviews and a
    /// signed-in demo account enrolled in the free course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a seed record is invalid.
    pub fn with_demo_data() -> Result<Self, StorageError> {
        let repo = Self::new();
        let video = Url::parse(SAMPLE_VIDEO).map_err(invalid)?;
        for demo in COURSES {
            let course_id = CourseId::new(demo.id).map_err(invalid)?;
            let course = Course::new(course_id.clone(), demo.title)
                .map_err(invalid)?
                .with_category(demo.category)
                .with_description(demo.description)
                .with_instructor(demo.instructor)
                .with_price(demo.price);
            repo.insert_course(course)?;
            for (id, title, duration) in demo.lectures {
                let lecture_id = LectureId::new(*id).map_err(invalid)?;
                let lecture =
                    Lecture::new(lecture_id, *title, *duration, video.clone()).map_err(invalid)?;
                repo.insert_lecture(&course_id, lecture)?;
            }
        }

        let profile = UserProfile::new(Some("Demo Student".into()), Some(DEMO_EMAIL.into()));
        repo.register_account(DEMO_EMAIL, DEMO_PASSWORD, profile.clone())?;
        repo.set_current_profile(Some(profile))?;
        repo.insert_payment(Payment {
            id: "demo-pay-1".into(),
            course_id: CourseId::new("rust-101").map_err(invalid)?,
            amount: Some(0.0),
            course_title: Some("Rust from Scratch".into()),
            course_image: None,
        })?;
        for (id, course, author, stars, text) in REVIEWS {
            repo.insert_review(Review {
                id: ReviewId::new(*id).map_err(invalid)?,
                course_id: CourseId::new(*course).map_err(invalid)?,
                rating: Rating::new(*stars).map_err(invalid)?,
                text: (!text.is_empty()).then(|| (*text).to_owned()),
                author: Some((*author).to_owned()),
                course_title: None,
                course_image: None,
                created_at: None,
            })?;
        }
        repo.set_progress(WatchProgress::new(
            LectureId::new("rust-101-1").map_err(invalid)?,
            WatchStatus::Completed,
            596,
        ))?;
        repo.set_progress(WatchProgress::new(
            LectureId::new("rust-101-2").map_err(invalid)?,
            WatchStatus::Paused,
            42,
        ))?;
        Ok(repo)
    }
}

fn invalid<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        CourseRepository, EnrollmentRepository, ProgressRepository, ReviewRepository,
    };

    #[tokio::test]
    async fn demo_data_has_resumable_progress() {
        let repo = InMemoryRepository::with_demo_data().unwrap();
        let lectures = repo
            .list_lectures(&CourseId::new("rust-101").unwrap())
            .await
            .unwrap();
        assert_eq!(lectures.len(), 3);
        assert_eq!(lectures[1].watched_seconds(), 42);

        let categories = repo.list_categories().await.unwrap();
        assert_eq!(categories, vec!["Art".to_string(), "Programming".to_string()]);
    }

    #[tokio::test]
    async fn demo_student_owns_the_free_course() {
        let repo = InMemoryRepository::with_demo_data().unwrap();
        let payments = repo.list_payments().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert!(repo.is_enrolled(&payments[0].course_id).await.unwrap());
        assert!(repo.my_reviews().await.unwrap().is_empty());
        let reviews = repo
            .course_reviews(&CourseId::new("rust-101").unwrap())
            .await
            .unwrap();
        assert_eq!(reviews.len(), 2);
    }
}
