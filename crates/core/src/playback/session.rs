use crate::model::{Lecture, WatchProgress, WatchStatus, whole_seconds};
use crate::playback::report::{ProgressReport, ReportPolicy};
use crate::playback::surface::{MediaError, MediaLayout, MediaSurface};
use crate::playback::threshold::ThresholdSet;

/// In-memory controller for one lecture at a time.
///
/// Owns the media surface and turns its events into progress reports. The
/// session never talks to the network: every handler returns the reports to
/// deliver and the caller sends them fire-and-forget.
#[derive(Debug)]
pub struct PlaybackSession<M: MediaSurface> {
    surface: M,
    lecture: Lecture,
    policy: ReportPolicy,
    resume_from: Option<u32>,
    current_time: f64,
    duration: f64,
    volume: f64,
    is_playing: bool,
    is_fullscreen: bool,
    layout: MediaLayout,
    windowed_layout: Option<MediaLayout>,
    swapping_source: bool,
}

impl<M: MediaSurface> PlaybackSession<M> {
    /// Start a session on `lecture`, resuming from `saved` once metadata loads.
    pub fn load(mut surface: M, lecture: Lecture, saved: Option<&WatchProgress>) -> Self {
        surface.load_source(lecture.media_url());
        surface.pause();
        let layout = MediaLayout::windowed();
        surface.apply_layout(&layout);
        surface.set_volume(1.0);

        let (policy, resume_from) = Self::fresh_policy(&lecture, saved);
        let duration = f64::from(lecture.duration_seconds());
        Self {
            surface,
            lecture,
            policy,
            resume_from,
            current_time: 0.0,
            duration,
            volume: 1.0,
            is_playing: false,
            is_fullscreen: false,
            layout,
            windowed_layout: None,
            swapping_source: false,
        }
    }

    /// Switch to another lecture on the same surface.
    ///
    /// Thresholds and the periodic window start over; volume and fullscreen
    /// carry across. Until the new source reports its metadata, time updates
    /// and pauses still belong to the old media and are ignored.
    pub fn load_lecture(&mut self, lecture: Lecture, saved: Option<&WatchProgress>) {
        self.surface.load_source(lecture.media_url());
        self.surface.pause();
        let (policy, resume_from) = Self::fresh_policy(&lecture, saved);
        self.duration = f64::from(lecture.duration_seconds());
        self.lecture = lecture;
        self.policy = policy;
        self.resume_from = resume_from;
        self.current_time = 0.0;
        self.is_playing = false;
        self.swapping_source = true;
    }

    fn fresh_policy(lecture: &Lecture, saved: Option<&WatchProgress>) -> (ReportPolicy, Option<u32>) {
        let status = saved.map_or(WatchStatus::NotStarted, |p| p.status);
        let resume_from = saved
            .map(|p| p.watched_seconds)
            .filter(|seconds| *seconds > 0);
        (ReportPolicy::new(lecture.id().clone(), status), resume_from)
    }

    /// Metadata is known: adopt the real duration and apply the pending resume.
    ///
    /// Returns the position seeked to, if any. The resume offset is clamped to
    /// one second before the end so a finished lecture does not instantly end
    /// again.
    pub fn on_loaded_metadata(&mut self, duration_seconds: f64) -> Option<f64> {
        self.swapping_source = false;
        if duration_seconds.is_finite() && duration_seconds > 0.0 {
            self.duration = duration_seconds;
        }
        let saved = self.resume_from.take()?;
        let target = f64::from(saved).min((self.duration - 1.0).max(0.0));
        self.surface.seek(target);
        self.current_time = target;
        self.policy.anchor_at(whole_seconds(target));
        Some(target)
    }

    /// Media clock tick.
    ///
    /// An unknown host duration falls back to the last known one.
    pub fn on_time_update(
        &mut self,
        current_seconds: f64,
        duration_seconds: f64,
    ) -> Vec<ProgressReport> {
        if self.swapping_source {
            return Vec::new();
        }
        self.current_time = current_seconds;
        if duration_seconds.is_finite() && duration_seconds > 0.0 {
            self.duration = duration_seconds;
        }
        self.policy.on_time_update(current_seconds, self.duration)
    }

    pub fn on_pause(&mut self, current_seconds: f64) -> Option<ProgressReport> {
        self.is_playing = false;
        if self.swapping_source {
            return None;
        }
        self.current_time = current_seconds;
        self.policy.on_pause(current_seconds)
    }

    pub fn on_ended(&mut self) -> ProgressReport {
        self.is_playing = false;
        self.current_time = self.duration;
        self.policy.on_ended(self.duration)
    }

    /// Play if paused, pause if playing. Returns the new playing state.
    ///
    /// # Errors
    ///
    /// Returns the surface's `MediaError` when playback is refused; the
    /// session stays paused.
    pub fn toggle_play(&mut self) -> Result<bool, MediaError> {
        if self.is_playing {
            self.surface.pause();
            self.is_playing = false;
        } else {
            self.surface.play()?;
            self.is_playing = true;
        }
        Ok(self.is_playing)
    }

    /// A host that starts playback asynchronously reports a late refusal here.
    pub fn on_play_rejected(&mut self) {
        self.is_playing = false;
    }

    /// Jump to a position. Emits no report; the periodic window restarts at
    /// the target so skipped time is not counted as watched.
    pub fn seek(&mut self, target_seconds: f64) -> f64 {
        let upper = if self.duration > 0.0 { self.duration } else { 0.0 };
        let target = if target_seconds.is_finite() {
            target_seconds.clamp(0.0, upper)
        } else {
            self.current_time
        };
        self.surface.seek(target);
        self.current_time = target;
        self.policy.anchor_at(whole_seconds(target));
        target
    }

    /// Set the volume, clamped to `[0, 1]`. Returns the applied value.
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
            self.surface.set_volume(self.volume);
        }
        self.volume
    }

    /// Enter or leave fullscreen. Returns the new fullscreen state.
    ///
    /// # Errors
    ///
    /// Returns the surface's `MediaError`; the layout stays untouched.
    pub fn toggle_fullscreen(&mut self) -> Result<bool, MediaError> {
        let entering = !self.is_fullscreen;
        if entering {
            self.surface.request_fullscreen()?;
        } else {
            self.surface.exit_fullscreen()?;
        }
        self.on_fullscreen_change(entering);
        Ok(self.is_fullscreen)
    }

    /// Fullscreen state changed, by request or by the host (e.g. Esc).
    ///
    /// Entering remembers the windowed layout; leaving restores it exactly.
    /// Repeated notifications for the same state are ignored.
    pub fn on_fullscreen_change(&mut self, entering: bool) {
        if entering == self.is_fullscreen {
            return;
        }
        self.is_fullscreen = entering;
        if entering {
            self.windowed_layout = Some(self.layout);
            self.layout = MediaLayout::fullscreen();
        } else if let Some(saved) = self.windowed_layout.take() {
            self.layout = saved;
        }
        self.surface.apply_layout(&self.layout);
    }

    #[must_use]
    pub fn lecture(&self) -> &Lecture {
        &self.lecture
    }

    #[must_use]
    pub fn status(&self) -> WatchStatus {
        self.policy.status()
    }

    #[must_use]
    pub fn reported_thresholds(&self) -> ThresholdSet {
        self.policy.reported()
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    #[must_use]
    pub fn layout(&self) -> MediaLayout {
        self.layout
    }

    #[must_use]
    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LectureId;
    use crate::playback::report::ReportTrigger;
    use crate::playback::surface::{RecordingSurface, SurfaceCommand};
    use url::Url;

    fn lecture(id: &str, duration: u32) -> Lecture {
        Lecture::new(
            LectureId::new(id).unwrap(),
            format!("Lecture {id}"),
            duration,
            Url::parse(&format!("https://cdn.example.com/{id}.mp4")).unwrap(),
        )
        .unwrap()
    }

    fn saved(id: &str, status: WatchStatus, watched: u32) -> WatchProgress {
        WatchProgress::new(LectureId::new(id).unwrap(), status, watched)
    }

    fn session(status: WatchStatus, watched: u32) -> PlaybackSession<RecordingSurface> {
        let progress = saved("a", status, watched);
        PlaybackSession::load(RecordingSurface::new(), lecture("a", 120), Some(&progress))
    }

    #[test]
    fn resumes_from_saved_offset() {
        let mut session = session(WatchStatus::Paused, 42);
        assert_eq!(session.on_loaded_metadata(120.0), Some(42.0));
        assert_eq!(session.current_time(), 42.0);
        assert_eq!(session.surface().commands().last(), Some(&SurfaceCommand::Seek(42.0)));
    }

    #[test]
    fn resume_past_end_is_clamped() {
        let mut session = session(WatchStatus::InProgress, 125);
        assert_eq!(session.on_loaded_metadata(120.0), Some(119.0));
    }

    #[test]
    fn resume_happens_once() {
        let mut session = session(WatchStatus::InProgress, 42);
        assert!(session.on_loaded_metadata(120.0).is_some());
        assert!(session.on_loaded_metadata(120.0).is_none());
    }

    #[test]
    fn zero_progress_does_not_seek() {
        let mut session = session(WatchStatus::NotStarted, 0);
        assert!(session.on_loaded_metadata(120.0).is_none());
        assert_eq!(session.current_time(), 0.0);
    }

    #[test]
    fn resume_anchors_periodic_window() {
        let mut session = session(WatchStatus::Paused, 42);
        session.on_loaded_metadata(1_000.0);
        assert!(session.on_time_update(43.0, 1_000.0).is_empty());
        let reports = session.on_time_update(52.0, 1_000.0);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].trigger, ReportTrigger::Periodic);
    }

    #[test]
    fn completed_at_load_is_never_downgraded() {
        let mut session = session(WatchStatus::Completed, 120);
        session.on_loaded_metadata(120.0);
        session.seek(0.0);
        let mut reports = Vec::new();
        for t in 0..=120 {
            reports.extend(session.on_time_update(f64::from(t), 120.0));
        }
        reports.extend(session.on_pause(60.0));
        assert!(reports.is_empty());
        assert_eq!(session.status(), WatchStatus::Completed);
    }

    #[test]
    fn ended_reports_exactly_one_completion() {
        let mut session = session(WatchStatus::InProgress, 0);
        session.on_loaded_metadata(120.0);
        session.on_time_update(120.0, 120.0);
        let report = session.on_ended();
        assert_eq!(report.update.status, WatchStatus::Completed);
        assert_eq!(report.update.watched_seconds, 120);
        assert!(!session.is_playing());
    }

    #[test]
    fn seek_emits_nothing_and_clamps() {
        let mut session = session(WatchStatus::NotStarted, 0);
        session.on_loaded_metadata(120.0);
        assert_eq!(session.seek(500.0), 120.0);
        assert_eq!(session.seek(-3.0), 0.0);
        assert!(session.reported_thresholds().is_empty());
    }

    #[test]
    fn rejected_play_stays_paused() {
        let progress = saved("a", WatchStatus::NotStarted, 0);
        let surface = RecordingSurface::new().rejecting_play("autoplay");
        let mut session = PlaybackSession::load(surface, lecture("a", 120), Some(&progress));
        assert!(session.toggle_play().is_err());
        assert!(!session.is_playing());
    }

    #[test]
    fn toggle_play_alternates() {
        let mut session = session(WatchStatus::NotStarted, 0);
        assert_eq!(session.toggle_play(), Ok(true));
        assert_eq!(session.toggle_play(), Ok(false));
        session.toggle_play().unwrap();
        session.on_play_rejected();
        assert!(!session.is_playing());
    }

    #[test]
    fn volume_is_clamped() {
        let mut session = session(WatchStatus::NotStarted, 0);
        assert_eq!(session.set_volume(0.4), 0.4);
        assert_eq!(session.set_volume(3.0), 1.0);
        assert_eq!(session.set_volume(-1.0), 0.0);
        assert_eq!(session.set_volume(f64::NAN), 0.0);
    }

    #[test]
    fn fullscreen_twice_restores_layout() {
        let mut session = session(WatchStatus::NotStarted, 0);
        let before = session.layout();
        assert_eq!(session.toggle_fullscreen(), Ok(true));
        assert_eq!(session.layout(), MediaLayout::fullscreen());
        assert_eq!(session.toggle_fullscreen(), Ok(false));
        assert_eq!(session.layout(), before);
        assert_eq!(session.surface().last_layout(), Some(before));
    }

    #[test]
    fn host_exit_is_idempotent() {
        let mut session = session(WatchStatus::NotStarted, 0);
        session.toggle_fullscreen().unwrap();
        session.on_fullscreen_change(false);
        session.on_fullscreen_change(false);
        assert!(!session.is_fullscreen());
        assert_eq!(session.layout(), MediaLayout::windowed());
    }

    #[test]
    fn unsupported_fullscreen_degrades() {
        let progress = saved("a", WatchStatus::NotStarted, 0);
        let surface = RecordingSurface::new().without_fullscreen();
        let mut session = PlaybackSession::load(surface, lecture("a", 120), Some(&progress));
        assert!(session.toggle_fullscreen().is_err());
        assert!(!session.is_fullscreen());
        assert_eq!(session.layout(), MediaLayout::windowed());
    }

    #[test]
    fn switching_lectures_resets_thresholds() {
        let mut session = session(WatchStatus::NotStarted, 0);
        session.on_loaded_metadata(120.0);
        session.on_time_update(61.0, 120.0);
        assert_eq!(session.reported_thresholds().len(), 2);
        session.set_volume(0.3);

        session.load_lecture(lecture("b", 60), None);
        assert!(session.reported_thresholds().is_empty());
        assert_eq!(session.status(), WatchStatus::NotStarted);
        assert_eq!(session.lecture().id().as_str(), "b");
        assert_eq!(session.volume(), 0.3);
        session.on_loaded_metadata(60.0);
        let reports = session.on_time_update(15.0, 60.0);
        assert_eq!(reports[0].lecture_id.as_str(), "b");
    }

    #[test]
    fn old_media_events_after_switch_are_ignored() {
        let mut session = session(WatchStatus::NotStarted, 0);
        session.on_loaded_metadata(120.0);
        session.toggle_play().unwrap();
        session.on_time_update(80.0, 120.0);

        let progress = saved("b", WatchStatus::Paused, 30);
        session.load_lecture(lecture("b", 60), Some(&progress));
        // The old element settles after the swap: a pause at 0, a late tick.
        assert!(session.on_pause(0.0).is_none());
        assert!(session.on_time_update(90.0, 120.0).is_empty());
        assert!(session.reported_thresholds().is_empty());

        assert_eq!(session.on_loaded_metadata(60.0), Some(30.0));
        let report = session.on_pause(31.0).unwrap();
        assert_eq!(report.lecture_id.as_str(), "b");
        assert_eq!(report.update.watched_seconds, 31);
    }

    #[test]
    fn unknown_host_duration_uses_known_length() {
        let mut session = session(WatchStatus::NotStarted, 0);
        session.on_time_update(30.0, f64::NAN);
        assert_eq!(session.duration(), 120.0);
        assert_eq!(session.reported_thresholds().len(), 1);
    }
}
