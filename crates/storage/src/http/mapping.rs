//! Wire shapes of the learning API and their conversion into domain types.
//!
//! Responses are wrapped as `{ status, data: { ... } }`, but several endpoints
//! have shipped with the payload at the top level instead. Everything here
//! accepts both.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use chrono::{DateTime, Utc};
use skillforge_core::model::{
    Course, CourseId, Lecture, LectureId, LectureWithProgress, Payment, Rating, Review, ReviewId,
    UserProfile, WatchProgress, WatchStatus, whole_seconds,
};
use tracing::warn;
use url::Url;

use crate::repository::StorageError;

pub(crate) const FALLBACK_COURSE_TITLE: &str = "Course";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// The `data` member of an envelope, or the body itself when unwrapped.
pub(crate) fn payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// `value[key]` when present, otherwise `value` unchanged.
pub(crate) fn member_or_self(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, StorageError> {
    serde_json::from_value(value).map_err(ser)
}

/// Ids arrive as strings or numbers depending on the table they come from.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve a possibly relative media or image path against the API origin.
pub(crate) fn resolve_url(base: &Url, raw: &str) -> Result<Url, StorageError> {
    Url::parse(raw).or_else(|_| base.join(raw)).map_err(ser)
}

//
// ─── COURSES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct CourseRow {
    #[serde(alias = "courseid", alias = "course_id", alias = "_id")]
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    course_title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, alias = "instructor")]
    author: Option<String>,
}

impl CourseRow {
    pub(crate) fn into_course(self, base: &Url) -> Result<Course, StorageError> {
        let id = id_string(&self.id).ok_or_else(|| ser("course without id"))?;
        let title = [self.title, self.course_title, self.name]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_COURSE_TITLE.to_owned());

        let mut course = Course::new(CourseId::new(id).map_err(ser)?, title).map_err(ser)?;
        if let Some(description) = self.description.filter(|d| !d.trim().is_empty()) {
            course = course.with_description(description);
        }
        if let Some(category) = self.category {
            course = course.with_category(category);
        }
        if let Some(price) = number(&self.price) {
            course = course.with_price(price);
        }
        if let Some(image) = self.image.filter(|i| !i.trim().is_empty()) {
            match resolve_url(base, &image) {
                Ok(url) => course = course.with_image_url(url),
                Err(err) => warn!(course = %course.id(), error = %err, "ignoring course image"),
            }
        }
        if let Some(author) = self.author.filter(|a| !a.trim().is_empty()) {
            course = course.with_instructor(author);
        }
        Ok(course)
    }
}

pub(crate) fn courses_from(body: Value, base: &Url) -> Result<Vec<Course>, StorageError> {
    let rows: Vec<CourseRow> = decode(member_or_self(payload(body), "courses"))?;
    rows.into_iter().map(|row| row.into_course(base)).collect()
}

pub(crate) fn course_from(body: Value, base: &Url) -> Result<Course, StorageError> {
    let value = member_or_self(member_or_self(body, "data"), "course");
    if value.is_null() {
        return Err(StorageError::NotFound);
    }
    decode::<CourseRow>(value)?.into_course(base)
}

//
// ─── LECTURES AND PROGRESS ────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct VideoRow {
    video_id: Value,
    #[serde(default)]
    video_title: Option<String>,
    #[serde(default)]
    video_duration: Value,
    video_url: String,
    #[serde(default)]
    progress: Option<ProgressRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRow {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    watched_seconds: Value,
}

impl VideoRow {
    fn into_lecture(self, position: usize, base: &Url) -> Result<LectureWithProgress, StorageError> {
        let id = id_string(&self.video_id).ok_or_else(|| ser("video without id"))?;
        let lecture_id = LectureId::new(id).map_err(ser)?;
        let title = self
            .video_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Lecture {}", position + 1));
        let duration = number(&self.video_duration).map_or(0, whole_seconds);
        let media_url = resolve_url(base, &self.video_url)?;

        let progress = self.progress.and_then(|row| {
            let status = match row.status.as_deref().map(str::parse::<WatchStatus>) {
                Some(Ok(status)) => status,
                None => WatchStatus::NotStarted,
                Some(Err(err)) => {
                    warn!(lecture = %lecture_id, error = %err, "ignoring progress record");
                    return None;
                }
            };
            let watched = number(&row.watched_seconds).map_or(0, whole_seconds);
            Some(WatchProgress::new(lecture_id.clone(), status, watched))
        });

        let lecture = Lecture::new(lecture_id, title, duration, media_url).map_err(ser)?;
        Ok(LectureWithProgress::new(lecture, progress))
    }
}

pub(crate) fn lectures_from(
    body: Value,
    base: &Url,
) -> Result<Vec<LectureWithProgress>, StorageError> {
    let rows: Vec<VideoRow> = decode(member_or_self(payload(body), "videos"))?;
    rows.into_iter()
        .enumerate()
        .map(|(position, row)| row.into_lecture(position, base))
        .collect()
}

//
// ─── USERS AND AUTH ───────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile::new(row.name, row.email)
    }
}

pub(crate) fn profile_from(body: Value) -> Result<UserProfile, StorageError> {
    let user: UserRow = decode(member_or_self(payload(body), "user"))?;
    Ok(user.into())
}

/// Token from `token` or `data.token`, plus the user when the response has one.
pub(crate) fn grant_parts(body: Value) -> Result<(String, Option<UserProfile>), StorageError> {
    let top_level = body.get("token").and_then(Value::as_str).map(str::to_owned);
    let data = payload(body);
    let token = top_level
        .or_else(|| data.get("token").and_then(Value::as_str).map(str::to_owned))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ser("auth response without token"))?;
    let profile = match data.get("user") {
        Some(user) if user.is_object() => Some(decode::<UserRow>(user.clone())?.into()),
        _ => None,
    };
    Ok((token, profile))
}

//
// ─── PAYMENTS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentRow {
    #[serde(default, rename = "isEnrolled")]
    is_enrolled: bool,
}

pub(crate) fn enrollment_from(body: Value) -> Result<bool, StorageError> {
    Ok(decode::<EnrollmentRow>(payload(body))?.is_enrolled)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutRow {
    url: String,
}

pub(crate) fn checkout_url_from(body: Value) -> Result<Url, StorageError> {
    let row: CheckoutRow = decode(payload(body))?;
    Url::parse(&row.url).map_err(ser)
}

/// A verified payment either reports `success`/`verified` or echoes the
/// enrollment; anything else counts as not verified.
pub(crate) fn verification_from(body: Value) -> bool {
    let status_ok = body.get("status").and_then(Value::as_str) == Some("success");
    let data = payload(body);
    let flagged = ["verified", "success", "isEnrolled"]
        .iter()
        .any(|key| data.get(*key).and_then(Value::as_bool) == Some(true));
    flagged || (status_ok && data.get("enrollment").is_some())
}

/// Course columns joined onto payment and review rows.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct JoinedCourse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl JoinedCourse {
    fn image_url(&self, base: &Url) -> Option<Url> {
        let raw = self.image.as_deref().filter(|i| !i.trim().is_empty())?;
        resolve_url(base, raw)
            .inspect_err(|err| warn!(error = %err, "ignoring course image"))
            .ok()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentRow {
    #[serde(alias = "id")]
    payment_id: Value,
    course_id: Value,
    #[serde(default)]
    amount: Value,
    #[serde(default, alias = "course")]
    courses: Option<JoinedCourse>,
}

impl PaymentRow {
    fn into_payment(self, base: &Url) -> Result<Payment, StorageError> {
        let id = id_string(&self.payment_id).ok_or_else(|| ser("payment without id"))?;
        let course_id = id_string(&self.course_id).ok_or_else(|| ser("payment without course"))?;
        let course = self.courses.unwrap_or_default();
        Ok(Payment {
            id,
            course_id: CourseId::new(course_id).map_err(ser)?,
            amount: number(&self.amount),
            course_image: course.image_url(base),
            course_title: course.title.filter(|t| !t.trim().is_empty()),
        })
    }
}

pub(crate) fn payments_from(body: Value, base: &Url) -> Result<Vec<Payment>, StorageError> {
    let rows: Vec<PaymentRow> = decode(member_or_self(payload(body), "payments"))?;
    rows.into_iter().map(|row| row.into_payment(base)).collect()
}

//
// ─── REVIEWS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthorRow {
    #[serde(default, alias = "name")]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRow {
    #[serde(alias = "id")]
    review_id: Value,
    #[serde(default)]
    course_id: Value,
    #[serde(default)]
    rating: Value,
    #[serde(default)]
    review: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, alias = "user")]
    users: Option<AuthorRow>,
    #[serde(default, alias = "course")]
    courses: Option<JoinedCourse>,
}

impl ReviewRow {
    /// `fallback_course` fills in rows from a per-course listing, which leave
    /// the course id out.
    fn into_review(
        self,
        fallback_course: Option<&CourseId>,
        base: &Url,
    ) -> Result<Option<Review>, StorageError> {
        let id = id_string(&self.review_id).ok_or_else(|| ser("review without id"))?;
        let id = ReviewId::new(id).map_err(ser)?;
        let Some(rating) = number(&self.rating).and_then(Rating::from_score) else {
            warn!(review = %id, "skipping review without a usable rating");
            return Ok(None);
        };
        let course_id = match (id_string(&self.course_id), fallback_course) {
            (Some(raw), _) => CourseId::new(raw).map_err(ser)?,
            (None, Some(course)) => course.clone(),
            (None, None) => return Err(ser("review without course")),
        };
        let author = self.users.unwrap_or_default();
        let course = self.courses.unwrap_or_default();
        Ok(Some(Review {
            id,
            course_id,
            rating,
            text: self.review.filter(|t| !t.trim().is_empty()),
            author: [author.full_name, author.email]
                .into_iter()
                .flatten()
                .find(|a| !a.trim().is_empty()),
            course_image: course.image_url(base),
            course_title: course.title.filter(|t| !t.trim().is_empty()),
            created_at: self
                .created_at
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|at| at.with_timezone(&Utc)),
        }))
    }
}

pub(crate) fn reviews_from(
    body: Value,
    course: Option<&CourseId>,
    base: &Url,
) -> Result<Vec<Review>, StorageError> {
    let rows: Vec<ReviewRow> = decode(member_or_self(payload(body), "reviews"))?;
    let mut reviews = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(review) = row.into_review(course, base)? {
            reviews.push(review);
        }
    }
    Ok(reviews)
}
