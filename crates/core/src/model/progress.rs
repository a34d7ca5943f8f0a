use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::LectureId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("unknown watch status: {0}")]
    UnknownStatus(String),
}

//
// ─── WATCH STATUS ─────────────────────────────────────────────────────────────
//

/// Lifecycle of a single lecture for the signed-in user.
///
/// `NotStarted → InProgress → {Paused ⇄ InProgress} → Completed`.
/// `Completed` is terminal: no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    #[default]
    NotStarted,
    InProgress,
    Paused,
    Completed,
}

impl WatchStatus {
    /// Wire representation used by the progress API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WatchStatus::NotStarted => "not_started",
            WatchStatus::InProgress => "in_progress",
            WatchStatus::Paused => "paused",
            WatchStatus::Completed => "completed",
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, WatchStatus::Completed)
    }

    /// True once the learner has touched the lecture at all.
    #[must_use]
    pub fn is_started(self) -> bool {
        !matches!(self, WatchStatus::NotStarted)
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Re-reporting the same status is allowed (a periodic `InProgress` after
    /// an `InProgress` threshold), anything leaving `Completed` is not.
    #[must_use]
    pub fn can_transition_to(self, next: WatchStatus) -> bool {
        match (self, next) {
            (WatchStatus::Completed, WatchStatus::Completed) => true,
            (WatchStatus::Completed, _) => false,
            (_, WatchStatus::NotStarted) => self == WatchStatus::NotStarted,
            _ => true,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            other => Err(ProgressError::UnknownStatus(other.to_owned())),
        }
    }
}

//
// ─── PROGRESS RECORDS ─────────────────────────────────────────────────────────
//

/// Persisted watch progress for one lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProgress {
    pub lecture_id: LectureId,
    pub status: WatchStatus,
    pub watched_seconds: u32,
}

impl WatchProgress {
    #[must_use]
    pub fn new(lecture_id: LectureId, status: WatchStatus, watched_seconds: u32) -> Self {
        Self {
            lecture_id,
            status,
            watched_seconds,
        }
    }

    #[must_use]
    pub fn not_started(lecture_id: LectureId) -> Self {
        Self::new(lecture_id, WatchStatus::NotStarted, 0)
    }

    /// Merge a client update the way the progress store does: a completed
    /// record keeps its status, only the watched position moves.
    pub fn apply(&mut self, update: ProgressUpdate) {
        if self.status.can_transition_to(update.status) {
            self.status = update.status;
        }
        self.watched_seconds = update.watched_seconds;
    }
}

/// Body of a progress update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub status: WatchStatus,
    pub watched_seconds: u32,
}

impl ProgressUpdate {
    #[must_use]
    pub fn new(status: WatchStatus, watched_seconds: u32) -> Self {
        Self {
            status,
            watched_seconds,
        }
    }
}

/// Convert a media clock reading into whole watched seconds.
///
/// Negative, NaN and infinite readings collapse to zero.
#[must_use]
pub fn whole_seconds(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let floored = seconds.floor();
    if floored >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = floored as u32;
        value
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture() -> LectureId {
        LectureId::new("l1").unwrap()
    }

    #[test]
    fn status_parses_wire_strings() {
        assert_eq!("in_progress".parse::<WatchStatus>().unwrap(), WatchStatus::InProgress);
        assert_eq!("completed".parse::<WatchStatus>().unwrap(), WatchStatus::Completed);
        let err = "done".parse::<WatchStatus>().unwrap_err();
        assert_eq!(err, ProgressError::UnknownStatus("done".into()));
    }

    #[test]
    fn completed_is_absorbing() {
        let done = WatchStatus::Completed;
        assert!(!done.can_transition_to(WatchStatus::InProgress));
        assert!(!done.can_transition_to(WatchStatus::Paused));
        assert!(!done.can_transition_to(WatchStatus::NotStarted));
        assert!(done.can_transition_to(WatchStatus::Completed));
    }

    #[test]
    fn paused_and_in_progress_alternate() {
        assert!(WatchStatus::InProgress.can_transition_to(WatchStatus::Paused));
        assert!(WatchStatus::Paused.can_transition_to(WatchStatus::InProgress));
        assert!(!WatchStatus::Paused.can_transition_to(WatchStatus::NotStarted));
    }

    #[test]
    fn apply_keeps_completed_status() {
        let mut progress = WatchProgress::new(lecture(), WatchStatus::Completed, 120);
        progress.apply(ProgressUpdate::new(WatchStatus::Paused, 30));
        assert_eq!(progress.status, WatchStatus::Completed);
        assert_eq!(progress.watched_seconds, 30);
    }

    #[test]
    fn whole_seconds_floors_and_clamps() {
        assert_eq!(whole_seconds(42.9), 42);
        assert_eq!(whole_seconds(-3.0), 0);
        assert_eq!(whole_seconds(f64::NAN), 0);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ProgressUpdate::new(WatchStatus::InProgress, 5)).unwrap();
        assert_eq!(json, r#"{"status":"in_progress","watched_seconds":5}"#);
    }
}
