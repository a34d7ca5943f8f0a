use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skillforge_core::model::{
    Course, CourseId, Lecture, LectureId, LectureWithProgress, Payment, ProgressUpdate, Review,
    ReviewDraft, ReviewId, UserProfile, WatchProgress,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use url::Url;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("not authorized")]
    Unauthorized,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("request failed with status {0}")]
    HttpStatus(u16),

    #[error("serialization error: {0}")]
    Serialization(String),
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

//
// ─── SESSION TOKEN ────────────────────────────────────────────────────────────
//

/// Bearer token shared between the auth session and every adapter that
/// talks to the API. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionToken {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token.filter(|t| !t.trim().is_empty()))),
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    pub fn set(&self, token: Option<String>) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = token.filter(|t| !t.trim().is_empty());
        }
    }

    pub fn clear(&self) {
        self.set(None);
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

//
// ─── AUTH RECORDS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub profile: UserProfile,
}

//
// ─── REPOSITORY CONTRACTS ─────────────────────────────────────────────────────
//

/// Lectures of a course and the signed-in user's progress on them.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Lectures in course order, each with the user's saved progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` without a valid session, or other
    /// storage errors.
    async fn list_lectures(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<LectureWithProgress>, StorageError>;

    /// Record the latest status and position for one lecture.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update is rejected or cannot be sent.
    async fn update_progress(
        &self,
        lecture_id: &LectureId,
        update: ProgressUpdate,
    ) -> Result<(), StorageError>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Published courses, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be fetched.
    async fn list_courses(&self, category: Option<&str>) -> Result<Vec<Course>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the search cannot be performed.
    async fn search_courses(&self, query: &str) -> Result<Vec<Course>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn get_course(&self, id: &CourseId) -> Result<Course, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the category list cannot be fetched.
    async fn list_categories(&self) -> Result<Vec<String>, StorageError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` for bad credentials.
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn signup(&self, account: &NewAccount) -> Result<AuthGrant, StorageError>;

    /// Profile of the user the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` without a valid session.
    async fn current_profile(&self) -> Result<UserProfile, StorageError>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` when signed out.
    async fn is_enrolled(&self, course_id: &CourseId) -> Result<bool, StorageError>;

    /// Start a hosted checkout and return the page to send the user to.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if no checkout session can be created.
    async fn create_checkout_session(&self, course_id: &CourseId) -> Result<Url, StorageError>;

    /// Confirm a finished checkout. `true` once the enrollment exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payment cannot be verified.
    async fn verify_payment(&self, session_id: &str) -> Result<bool, StorageError>;

    /// The signed-in user's completed purchases, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` when signed out.
    async fn list_payments(&self) -> Result<Vec<Payment>, StorageError>;
}

/// Course reviews: public listings plus the signed-in user's own.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the reviews cannot be fetched.
    async fn course_reviews(&self, course_id: &CourseId) -> Result<Vec<Review>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` when signed out.
    async fn my_reviews(&self) -> Result<Vec<Review>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` when signed out, or
    /// `StorageError::Conflict` if the user already reviewed the course.
    async fn create_review(
        &self,
        course_id: &CourseId,
        draft: &ReviewDraft,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the review is not the user's.
    async fn update_review(&self, id: &ReviewId, draft: &ReviewDraft) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the review is not the user's.
    async fn delete_review(&self, id: &ReviewId) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY BACKEND ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct Account {
    password: String,
    profile: UserProfile,
}

/// Simple in-memory repository implementation for testing and offline use.
///
/// Auth is honored loosely: a login makes that account the current profile,
/// nothing else checks the token.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<Vec<Course>>>,
    lectures: Arc<Mutex<HashMap<CourseId, Vec<Lecture>>>>,
    progress: Arc<Mutex<HashMap<LectureId, WatchProgress>>>,
    progress_log: Arc<Mutex<Vec<(LectureId, ProgressUpdate)>>>,
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    current: Arc<Mutex<Option<UserProfile>>>,
    enrollments: Arc<Mutex<HashSet<CourseId>>>,
    checkouts: Arc<Mutex<HashMap<String, CourseId>>>,
    payments: Arc<Mutex<Vec<Payment>>>,
    reviews: Arc<Mutex<Vec<Review>>>,
    next_id: Arc<Mutex<u64>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a course, keeping insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn insert_course(&self, course: Course) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        match guard.iter_mut().find(|c| c.id() == course.id()) {
            Some(existing) => *existing = course,
            None => guard.push(course),
        }
        Ok(())
    }

    /// Append a lecture to a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn insert_lecture(&self, course_id: &CourseId, lecture: Lecture) -> Result<(), StorageError> {
        let mut guard = self.lectures.lock().map_err(poisoned)?;
        guard.entry(course_id.clone()).or_default().push(lecture);
        Ok(())
    }

    /// Seed saved progress without logging it as a client update.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn set_progress(&self, progress: WatchProgress) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        guard.insert(progress.lecture_id.clone(), progress);
        Ok(())
    }

    /// Every update received through `update_progress`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn progress_updates(&self) -> Result<Vec<(LectureId, ProgressUpdate)>, StorageError> {
        Ok(self.progress_log.lock().map_err(poisoned)?.clone())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn register_account(
        &self,
        email: &str,
        password: &str,
        profile: UserProfile,
    ) -> Result<(), StorageError> {
        let mut guard = self.accounts.lock().map_err(poisoned)?;
        guard.insert(
            email.trim().to_lowercase(),
            Account {
                password: password.to_owned(),
                profile,
            },
        );
        Ok(())
    }

    /// Make `profile` the signed-in user, or sign out with `None`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn set_current_profile(&self, profile: Option<UserProfile>) -> Result<(), StorageError> {
        *self.current.lock().map_err(poisoned)? = profile;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn enroll(&self, course_id: &CourseId) -> Result<(), StorageError> {
        self.enrollments
            .lock()
            .map_err(poisoned)?
            .insert(course_id.clone());
        Ok(())
    }

    /// Record a purchase and enroll in its course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn insert_payment(&self, payment: Payment) -> Result<(), StorageError> {
        self.enroll(&payment.course_id)?;
        self.payments.lock().map_err(poisoned)?.push(payment);
        Ok(())
    }

    /// Seed a review as-is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn insert_review(&self, review: Review) -> Result<(), StorageError> {
        self.reviews.lock().map_err(poisoned)?.push(review);
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> Result<String, StorageError> {
        let mut guard = self.next_id.lock().map_err(poisoned)?;
        *guard += 1;
        Ok(format!("{prefix}-{}", *guard))
    }

    fn current_name(&self) -> Result<String, StorageError> {
        self.current
            .lock()
            .map_err(poisoned)?
            .as_ref()
            .map(|profile| profile.certificate_name().to_owned())
            .ok_or(StorageError::Unauthorized)
    }

    fn course_title(&self, id: &CourseId) -> Result<Option<String>, StorageError> {
        Ok(self
            .courses
            .lock()
            .map_err(poisoned)?
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.title().to_owned()))
    }

    fn grant_for(&self, email: &str, profile: UserProfile) -> Result<AuthGrant, StorageError> {
        self.set_current_profile(Some(profile.clone()))?;
        Ok(AuthGrant {
            token: format!("offline-{}", email.trim().to_lowercase()),
            profile,
        })
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn list_lectures(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<LectureWithProgress>, StorageError> {
        let lectures = self.lectures.lock().map_err(poisoned)?;
        let Some(lectures) = lectures.get(course_id) else {
            let known = self
                .courses
                .lock()
                .map_err(poisoned)?
                .iter()
                .any(|c| c.id() == course_id);
            return if known {
                Ok(Vec::new())
            } else {
                Err(StorageError::NotFound)
            };
        };
        let progress = self.progress.lock().map_err(poisoned)?;
        Ok(lectures
            .iter()
            .map(|lecture| {
                LectureWithProgress::new(lecture.clone(), progress.get(lecture.id()).cloned())
            })
            .collect())
    }

    async fn update_progress(
        &self,
        lecture_id: &LectureId,
        update: ProgressUpdate,
    ) -> Result<(), StorageError> {
        {
            let mut progress = self.progress.lock().map_err(poisoned)?;
            progress
                .entry(lecture_id.clone())
                .or_insert_with(|| WatchProgress::not_started(lecture_id.clone()))
                .apply(update);
        }
        self.progress_log
            .lock()
            .map_err(poisoned)?
            .push((lecture_id.clone(), update));
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn list_courses(&self, category: Option<&str>) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        let wanted = category.map(|c| c.trim().to_lowercase());
        Ok(guard
            .iter()
            .filter(|course| match &wanted {
                None => true,
                Some(w) => course.category().is_some_and(|c| c.to_lowercase() == *w),
            })
            .cloned()
            .collect())
    }

    async fn search_courses(&self, query: &str) -> Result<Vec<Course>, StorageError> {
        let needle = query.trim().to_lowercase();
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|course| {
                course.title().to_lowercase().contains(&needle)
                    || course
                        .description()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Course, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        guard
            .iter()
            .find(|c| c.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_categories(&self) -> Result<Vec<String>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        let mut categories: Vec<String> = guard
            .iter()
            .filter_map(|c| c.category().map(str::to_owned))
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

#[async_trait]
impl AuthRepository for InMemoryRepository {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, StorageError> {
        let profile = {
            let accounts = self.accounts.lock().map_err(poisoned)?;
            let account = accounts
                .get(&credentials.email.trim().to_lowercase())
                .ok_or(StorageError::Unauthorized)?;
            if account.password != credentials.password {
                return Err(StorageError::Unauthorized);
            }
            account.profile.clone()
        };
        self.grant_for(&credentials.email, profile)
    }

    async fn signup(&self, account: &NewAccount) -> Result<AuthGrant, StorageError> {
        let key = account.email.trim().to_lowercase();
        let profile = UserProfile::new(Some(account.name.clone()), Some(key.clone()));
        {
            let mut accounts = self.accounts.lock().map_err(poisoned)?;
            if accounts.contains_key(&key) {
                return Err(StorageError::Conflict);
            }
            accounts.insert(
                key.clone(),
                Account {
                    password: account.password.clone(),
                    profile: profile.clone(),
                },
            );
        }
        self.grant_for(&key, profile)
    }

    async fn current_profile(&self) -> Result<UserProfile, StorageError> {
        self.current
            .lock()
            .map_err(poisoned)?
            .clone()
            .ok_or(StorageError::Unauthorized)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRepository {
    async fn is_enrolled(&self, course_id: &CourseId) -> Result<bool, StorageError> {
        if self.current.lock().map_err(poisoned)?.is_none() {
            return Err(StorageError::Unauthorized);
        }
        Ok(self.enrollments.lock().map_err(poisoned)?.contains(course_id))
    }

    async fn create_checkout_session(&self, course_id: &CourseId) -> Result<Url, StorageError> {
        let session_id = format!("cs_offline_{course_id}");
        let url = Url::parse(&format!("memory://checkout/{session_id}"))
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.checkouts
            .lock()
            .map_err(poisoned)?
            .insert(session_id, course_id.clone());
        Ok(url)
    }

    async fn verify_payment(&self, session_id: &str) -> Result<bool, StorageError> {
        let course = self.checkouts.lock().map_err(poisoned)?.remove(session_id);
        let Some(course_id) = course else {
            return Ok(false);
        };
        let course = self.get_course(&course_id).await.ok();
        self.insert_payment(Payment {
            id: self.next_id("pay")?,
            course_id,
            amount: course.as_ref().and_then(Course::price),
            course_title: course.as_ref().map(|c| c.title().to_owned()),
            course_image: course.as_ref().and_then(|c| c.image_url().cloned()),
        })?;
        Ok(true)
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, StorageError> {
        if self.current.lock().map_err(poisoned)?.is_none() {
            return Err(StorageError::Unauthorized);
        }
        Ok(self.payments.lock().map_err(poisoned)?.clone())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryRepository {
    async fn course_reviews(&self, course_id: &CourseId) -> Result<Vec<Review>, StorageError> {
        Ok(self
            .reviews
            .lock()
            .map_err(poisoned)?
            .iter()
            .filter(|r| r.course_id == *course_id)
            .cloned()
            .collect())
    }

    async fn my_reviews(&self) -> Result<Vec<Review>, StorageError> {
        let name = self.current_name()?;
        Ok(self
            .reviews
            .lock()
            .map_err(poisoned)?
            .iter()
            .filter(|r| r.author.as_deref() == Some(name.as_str()))
            .cloned()
            .collect())
    }

    async fn create_review(
        &self,
        course_id: &CourseId,
        draft: &ReviewDraft,
    ) -> Result<(), StorageError> {
        let name = self.current_name()?;
        let course_title = self.course_title(course_id)?;
        let id = ReviewId::new(self.next_id("rev")?)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut reviews = self.reviews.lock().map_err(poisoned)?;
        if reviews
            .iter()
            .any(|r| r.course_id == *course_id && r.author.as_deref() == Some(name.as_str()))
        {
            return Err(StorageError::Conflict);
        }
        reviews.push(Review {
            id,
            course_id: course_id.clone(),
            rating: draft.rating,
            text: draft.text.clone(),
            author: Some(name),
            course_title,
            course_image: None,
            created_at: Some(chrono::Utc::now()),
        });
        Ok(())
    }

    async fn update_review(&self, id: &ReviewId, draft: &ReviewDraft) -> Result<(), StorageError> {
        let name = self.current_name()?;
        let mut reviews = self.reviews.lock().map_err(poisoned)?;
        let review = reviews
            .iter_mut()
            .find(|r| r.id == *id && r.author.as_deref() == Some(name.as_str()))
            .ok_or(StorageError::NotFound)?;
        review.apply(draft);
        Ok(())
    }

    async fn delete_review(&self, id: &ReviewId) -> Result<(), StorageError> {
        let name = self.current_name()?;
        let mut reviews = self.reviews.lock().map_err(poisoned)?;
        let before = reviews.len();
        reviews.retain(|r| !(r.id == *id && r.author.as_deref() == Some(name.as_str())));
        if reviews.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub auth: Arc<dyn AuthRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub token: SessionToken,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(InMemoryRepository::new())
    }

    /// Wrap an existing in-memory store, e.g. one seeded by a test.
    #[must_use]
    pub fn from_memory(repo: InMemoryRepository) -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let auth: Arc<dyn AuthRepository> = Arc::new(repo.clone());
        let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(repo.clone());
        let reviews: Arc<dyn ReviewRepository> = Arc::new(repo);
        Self {
            progress,
            courses,
            auth,
            enrollments,
            reviews,
            token: SessionToken::default(),
        }
    }
}
