use crate::model::{LectureId, ProgressUpdate, WatchStatus, whole_seconds};
use crate::playback::threshold::{Threshold, ThresholdSet};

/// Watched seconds between two periodic backup reports.
pub const PERIODIC_REPORT_INTERVAL_SECS: u32 = 10;

/// Why a report was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTrigger {
    Threshold(Threshold),
    Periodic,
    Pause,
    Ended,
}

/// A progress update the session wants delivered to the progress store.
///
/// Delivery is best-effort: nothing waits on it and a failed send is not
/// retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub lecture_id: LectureId,
    pub update: ProgressUpdate,
    pub trigger: ReportTrigger,
}

/// Floor of the watched percentage.
///
/// Durations below one second count as one second.
#[must_use]
pub fn watched_percent(current_seconds: f64, duration_seconds: f64) -> u32 {
    if !current_seconds.is_finite() || current_seconds <= 0.0 {
        return 0;
    }
    let duration = duration_seconds.max(1.0);
    whole_seconds(current_seconds / duration * 100.0)
}

/// Decides which progress reports one lecture load emits.
///
/// Thresholds are marked before anything is sent, so each fires at most once
/// per load no matter what happens to the send. A lecture whose last known
/// status is `Completed` only ever emits the `ended` report.
#[derive(Debug, Clone)]
pub struct ReportPolicy {
    lecture_id: LectureId,
    status: WatchStatus,
    reported: ThresholdSet,
    periodic_anchor: u32,
}

impl ReportPolicy {
    #[must_use]
    pub fn new(lecture_id: LectureId, status: WatchStatus) -> Self {
        Self {
            lecture_id,
            status,
            reported: ThresholdSet::new(),
            periodic_anchor: 0,
        }
    }

    #[must_use]
    pub fn lecture_id(&self) -> &LectureId {
        &self.lecture_id
    }

    /// Last known status: the stored one, advanced by every report emitted.
    #[must_use]
    pub fn status(&self) -> WatchStatus {
        self.status
    }

    #[must_use]
    pub fn reported(&self) -> ThresholdSet {
        self.reported
    }

    #[must_use]
    pub fn periodic_anchor(&self) -> u32 {
        self.periodic_anchor
    }

    /// Restart the periodic window at the given position (resume or seek).
    pub fn anchor_at(&mut self, watched_seconds: u32) {
        self.periodic_anchor = watched_seconds;
    }

    /// Handle a media clock tick.
    ///
    /// Returns threshold reports in ascending order followed by at most one
    /// periodic backup. Durations below one second count as one second.
    pub fn on_time_update(
        &mut self,
        current_seconds: f64,
        duration_seconds: f64,
    ) -> Vec<ProgressReport> {
        let now = whole_seconds(current_seconds);
        let mut reports = Vec::new();

        let pct = watched_percent(current_seconds, duration_seconds);
        for threshold in Threshold::ALL {
            if pct < threshold.percent() || !self.reported.insert(threshold) {
                continue;
            }
            if self.status.is_completed() {
                continue;
            }
            reports.push(self.emit(
                threshold.report_status(),
                now,
                ReportTrigger::Threshold(threshold),
            ));
        }

        if now.saturating_sub(self.periodic_anchor) >= PERIODIC_REPORT_INTERVAL_SECS {
            self.periodic_anchor = now;
            if !self.status.is_completed() {
                reports.push(self.emit(WatchStatus::InProgress, now, ReportTrigger::Periodic));
            }
        }

        reports
    }

    /// Handle a pause. Never downgrades a completed lecture.
    pub fn on_pause(&mut self, current_seconds: f64) -> Option<ProgressReport> {
        if self.status.is_completed() {
            return None;
        }
        Some(self.emit(
            WatchStatus::Paused,
            whole_seconds(current_seconds),
            ReportTrigger::Pause,
        ))
    }

    /// Handle the end of the media. Always reports completion.
    pub fn on_ended(&mut self, duration_seconds: f64) -> ProgressReport {
        self.emit(
            WatchStatus::Completed,
            whole_seconds(duration_seconds),
            ReportTrigger::Ended,
        )
    }

    fn emit(
        &mut self,
        status: WatchStatus,
        watched_seconds: u32,
        trigger: ReportTrigger,
    ) -> ProgressReport {
        if self.status.can_transition_to(status) {
            self.status = status;
        }
        ProgressReport {
            lecture_id: self.lecture_id.clone(),
            update: ProgressUpdate::new(status, watched_seconds),
            trigger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(status: WatchStatus) -> ReportPolicy {
        ReportPolicy::new(LectureId::new("lec-1").unwrap(), status)
    }

    fn thresholds(reports: &[ProgressReport]) -> Vec<u32> {
        reports
            .iter()
            .filter_map(|r| match r.trigger {
                ReportTrigger::Threshold(t) => Some(t.percent()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn percent_uses_floor_and_min_duration() {
        assert_eq!(watched_percent(30.0, 120.0), 25);
        assert_eq!(watched_percent(29.9, 120.0), 24);
        assert_eq!(watched_percent(0.5, 0.0), 50);
        assert_eq!(watched_percent(-1.0, 120.0), 0);
    }

    #[test]
    fn each_threshold_fires_once_for_monotonic_ticks() {
        let mut policy = policy(WatchStatus::NotStarted);
        let mut sent = Vec::new();
        let mut t = 0.0;
        while t <= 120.0 {
            sent.extend(thresholds(&policy.on_time_update(t, 120.0)));
            t += 0.25;
        }
        assert_eq!(sent, vec![25, 50, 75, 100]);
    }

    #[test]
    fn jumping_past_several_thresholds_sends_them_in_order() {
        let mut policy = policy(WatchStatus::InProgress);
        let reports = policy.on_time_update(100.0, 120.0);
        assert_eq!(thresholds(&reports), vec![25, 50, 75]);
        assert!(reports.iter().all(|r| r.update.watched_seconds == 100));
        assert!(
            reports
                .iter()
                .filter(|r| matches!(r.trigger, ReportTrigger::Threshold(_)))
                .all(|r| r.update.status == WatchStatus::InProgress)
        );
    }

    #[test]
    fn full_threshold_reports_completion() {
        let mut policy = policy(WatchStatus::InProgress);
        let reports = policy.on_time_update(120.0, 120.0);
        let full = reports
            .iter()
            .find(|r| r.trigger == ReportTrigger::Threshold(Threshold::Full))
            .unwrap();
        assert_eq!(full.update.status, WatchStatus::Completed);
        assert_eq!(policy.status(), WatchStatus::Completed);
    }

    #[test]
    fn replay_after_backward_seek_is_not_resent() {
        let mut policy = policy(WatchStatus::NotStarted);
        assert_eq!(thresholds(&policy.on_time_update(61.0, 120.0)), vec![25, 50]);
        policy.anchor_at(5);
        assert!(thresholds(&policy.on_time_update(5.0, 120.0)).is_empty());
        assert!(thresholds(&policy.on_time_update(62.0, 120.0)).is_empty());
        assert_eq!(policy.reported().len(), 2);
    }

    #[test]
    fn completed_lecture_marks_but_never_sends() {
        let mut policy = policy(WatchStatus::Completed);
        for t in 0..=120 {
            assert!(policy.on_time_update(f64::from(t), 120.0).is_empty());
        }
        assert_eq!(policy.reported().len(), 4);
        assert!(policy.on_pause(60.0).is_none());
        assert_eq!(policy.status(), WatchStatus::Completed);
    }

    #[test]
    fn ended_always_reports_completion() {
        let mut policy = policy(WatchStatus::Completed);
        policy.on_time_update(120.0, 120.0);
        let report = policy.on_ended(120.7);
        assert_eq!(report.update.status, WatchStatus::Completed);
        assert_eq!(report.update.watched_seconds, 120);
        assert_eq!(report.trigger, ReportTrigger::Ended);
    }

    #[test]
    fn periodic_backup_counts_watched_seconds() {
        let mut policy = policy(WatchStatus::NotStarted);
        // Long video so thresholds stay quiet.
        let duration = 10_000.0;
        assert!(policy.on_time_update(9.0, duration).is_empty());
        let reports = policy.on_time_update(10.2, duration);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].trigger, ReportTrigger::Periodic);
        assert_eq!(reports[0].update, ProgressUpdate::new(WatchStatus::InProgress, 10));

        // Paused: the clock does not move, however many ticks arrive.
        for _ in 0..50 {
            assert!(policy.on_time_update(15.0, duration).is_empty());
        }
        assert_eq!(policy.on_time_update(20.0, duration).len(), 1);
        assert_eq!(policy.periodic_anchor(), 20);
    }

    #[test]
    fn periodic_is_skipped_once_completed() {
        let mut policy = policy(WatchStatus::Completed);
        assert!(policy.on_time_update(50.0, 10_000.0).is_empty());
        assert_eq!(policy.periodic_anchor(), 50);
    }

    #[test]
    fn pause_then_resume_moves_through_states() {
        let mut policy = policy(WatchStatus::NotStarted);
        policy.on_time_update(30.0, 120.0);
        assert_eq!(policy.status(), WatchStatus::InProgress);
        let paused = policy.on_pause(31.4).unwrap();
        assert_eq!(paused.update, ProgressUpdate::new(WatchStatus::Paused, 31));
        assert_eq!(policy.status(), WatchStatus::Paused);
        policy.on_time_update(60.0, 120.0);
        assert_eq!(policy.status(), WatchStatus::InProgress);
    }

    #[test]
    fn zero_duration_counts_as_one_second() {
        let mut policy = policy(WatchStatus::NotStarted);
        assert!(policy.on_time_update(0.0, 0.0).is_empty());
        assert_eq!(thresholds(&policy.on_time_update(1.0, 0.0)), vec![25, 50, 75, 100]);
        assert_eq!(policy.status(), WatchStatus::Completed);
    }
}
