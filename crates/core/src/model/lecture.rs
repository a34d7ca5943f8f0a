use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::LectureId;
use crate::model::progress::{WatchProgress, WatchStatus};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LectureError {
    #[error("lecture title cannot be empty")]
    EmptyTitle,
}

/// A single video unit within a course. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    id: LectureId,
    title: String,
    duration_seconds: u32,
    media_url: Url,
}

impl Lecture {
    /// # Errors
    ///
    /// Returns `LectureError::EmptyTitle` if the title is blank.
    pub fn new(
        id: LectureId,
        title: impl Into<String>,
        duration_seconds: u32,
        media_url: Url,
    ) -> Result<Self, LectureError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LectureError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            duration_seconds,
            media_url,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LectureId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    #[must_use]
    pub fn media_url(&self) -> &Url {
        &self.media_url
    }
}

/// A lecture as listed for the signed-in learner, with saved progress if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureWithProgress {
    pub lecture: Lecture,
    pub progress: Option<WatchProgress>,
}

impl LectureWithProgress {
    #[must_use]
    pub fn new(lecture: Lecture, progress: Option<WatchProgress>) -> Self {
        Self { lecture, progress }
    }

    /// Saved status, `NotStarted` when the store has no record.
    #[must_use]
    pub fn status(&self) -> WatchStatus {
        self.progress
            .as_ref()
            .map_or(WatchStatus::NotStarted, |p| p.status)
    }

    #[must_use]
    pub fn watched_seconds(&self) -> u32 {
        self.progress.as_ref().map_or(0, |p| p.watched_seconds)
    }
}

/// Tabs of the lecture list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LectureListFilter {
    #[default]
    All,
    /// Lectures the learner has started, paused or finished.
    Started,
}

impl LectureListFilter {
    #[must_use]
    pub fn matches(self, lecture: &LectureWithProgress) -> bool {
        match self {
            LectureListFilter::All => true,
            LectureListFilter::Started => lecture.status().is_started(),
        }
    }

    #[must_use]
    pub fn apply<'a>(self, lectures: &'a [LectureWithProgress]) -> Vec<&'a LectureWithProgress> {
        lectures.iter().filter(|l| self.matches(l)).collect()
    }
}

/// Pick the lecture to open: the requested one if present, else the first.
#[must_use]
pub fn select_lecture<'a>(
    lectures: &'a [LectureWithProgress],
    requested: Option<&LectureId>,
) -> Option<&'a LectureWithProgress> {
    requested
        .and_then(|id| lectures.iter().find(|l| l.lecture.id() == id))
        .or_else(|| lectures.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(id: &str, status: Option<WatchStatus>) -> LectureWithProgress {
        let lecture_id = LectureId::new(id).unwrap();
        let lecture = Lecture::new(
            lecture_id.clone(),
            format!("Lecture {id}"),
            120,
            Url::parse("https://cdn.example.com/v.mp4").unwrap(),
        )
        .unwrap();
        LectureWithProgress::new(
            lecture,
            status.map(|s| WatchProgress::new(lecture_id, s, 10)),
        )
    }

    #[test]
    fn missing_progress_means_not_started() {
        let item = lecture("a", None);
        assert_eq!(item.status(), WatchStatus::NotStarted);
        assert_eq!(item.watched_seconds(), 0);
    }

    #[test]
    fn started_filter_drops_untouched_lectures() {
        let lectures = vec![
            lecture("a", None),
            lecture("b", Some(WatchStatus::NotStarted)),
            lecture("c", Some(WatchStatus::Paused)),
            lecture("d", Some(WatchStatus::Completed)),
        ];
        let started = LectureListFilter::Started.apply(&lectures);
        let ids: Vec<_> = started.iter().map(|l| l.lecture.id().as_str()).collect();
        assert_eq!(ids, vec!["c", "d"]);
        assert_eq!(LectureListFilter::All.apply(&lectures).len(), 4);
    }

    #[test]
    fn select_falls_back_to_first() {
        let lectures = vec![lecture("a", None), lecture("b", None)];
        let wanted = LectureId::new("b").unwrap();
        let missing = LectureId::new("zz").unwrap();
        assert_eq!(select_lecture(&lectures, Some(&wanted)).unwrap().lecture.id(), &wanted);
        assert_eq!(
            select_lecture(&lectures, Some(&missing)).unwrap().lecture.id().as_str(),
            "a"
        );
        assert!(select_lecture(&[], None).is_none());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Lecture::new(
            LectureId::new("x").unwrap(),
            "  ",
            1,
            Url::parse("https://cdn.example.com/v.mp4").unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, LectureError::EmptyTitle);
    }
}
