use std::sync::Arc;

use skillforge_core::model::{Lecture, WatchProgress};
use skillforge_core::playback::{MediaError, MediaSurface, PlaybackSession, ProgressReport};
use storage::repository::ProgressRepository;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::auth::SessionContext;

/// Delivers progress reports to the API without ever failing the caller.
#[derive(Clone)]
pub struct ProgressReporter {
    progress: Arc<dyn ProgressRepository>,
    session: Option<SessionContext>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            progress,
            session: None,
        }
    }

    /// Let an expired session sign the user out when a report is refused.
    #[must_use]
    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = Some(session);
        self
    }

    /// Send one report. Failures are logged and dropped.
    pub async fn send(&self, report: ProgressReport) {
        match self
            .progress
            .update_progress(&report.lecture_id, report.update)
            .await
        {
            Ok(()) => debug!(
                lecture = %report.lecture_id,
                status = report.update.status.as_str(),
                watched = report.update.watched_seconds,
                trigger = ?report.trigger,
                "progress reported"
            ),
            Err(err) => {
                warn!(
                    lecture = %report.lecture_id,
                    trigger = ?report.trigger,
                    error = %err,
                    "progress report dropped"
                );
                if let Some(session) = &self.session {
                    session.note_error(&err);
                }
            }
        }
    }

    /// Send in the background on the current tokio runtime.
    #[must_use]
    pub fn dispatch(&self, report: ProgressReport) -> JoinHandle<()> {
        let reporter = self.clone();
        tokio::spawn(async move { reporter.send(report).await })
    }
}

/// A playback session wired to the progress API.
///
/// Every media event goes through the session first; whatever reports it
/// produces are dispatched fire-and-forget. Playback never waits on them.
pub struct PlayerController<M: MediaSurface> {
    session: PlaybackSession<M>,
    reporter: ProgressReporter,
    in_flight: Vec<JoinHandle<()>>,
}

impl<M: MediaSurface> PlayerController<M> {
    #[must_use]
    pub fn new(
        surface: M,
        lecture: Lecture,
        saved: Option<&WatchProgress>,
        reporter: ProgressReporter,
    ) -> Self {
        Self {
            session: PlaybackSession::load(surface, lecture, saved),
            reporter,
            in_flight: Vec::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &PlaybackSession<M> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PlaybackSession<M> {
        &mut self.session
    }

    pub fn load_lecture(&mut self, lecture: Lecture, saved: Option<&WatchProgress>) {
        self.session.load_lecture(lecture, saved);
    }

    pub fn on_loaded_metadata(&mut self, duration_seconds: f64) -> Option<f64> {
        self.session.on_loaded_metadata(duration_seconds)
    }

    pub fn on_time_update(&mut self, current_seconds: f64, duration_seconds: f64) {
        let reports = self.session.on_time_update(current_seconds, duration_seconds);
        for report in reports {
            self.dispatch(report);
        }
    }

    pub fn on_pause(&mut self, current_seconds: f64) {
        if let Some(report) = self.session.on_pause(current_seconds) {
            self.dispatch(report);
        }
    }

    pub fn on_ended(&mut self) {
        let report = self.session.on_ended();
        self.dispatch(report);
    }

    /// Play or pause. A refused play is logged and leaves the player paused.
    pub fn toggle_play(&mut self) -> bool {
        match self.session.toggle_play() {
            Ok(playing) => playing,
            Err(err) => {
                warn!(lecture = %self.session.lecture().id(), error = %err, "playback refused");
                false
            }
        }
    }

    /// Late refusal from an asynchronous host.
    pub fn on_play_rejected(&mut self, err: &MediaError) {
        warn!(lecture = %self.session.lecture().id(), error = %err, "playback refused");
        self.session.on_play_rejected();
    }

    pub fn seek(&mut self, target_seconds: f64) -> f64 {
        self.session.seek(target_seconds)
    }

    pub fn set_volume(&mut self, volume: f64) -> f64 {
        self.session.set_volume(volume)
    }

    /// Toggle fullscreen. Failures are logged and leave the state unchanged.
    pub fn toggle_fullscreen(&mut self) -> bool {
        match self.session.toggle_fullscreen() {
            Ok(fullscreen) => fullscreen,
            Err(err) => {
                warn!(error = %err, "fullscreen change failed");
                self.session.is_fullscreen()
            }
        }
    }

    pub fn on_fullscreen_change(&mut self, entering: bool) {
        self.session.on_fullscreen_change(entering);
    }

    fn dispatch(&mut self, report: ProgressReport) {
        self.in_flight.retain(|handle| !handle.is_finished());
        self.in_flight.push(self.reporter.dispatch(report));
    }

    /// Hand over the reports sent so far, for callers that cannot hold the
    /// controller across an await.
    pub fn take_in_flight(&mut self) -> InFlightReports {
        InFlightReports(std::mem::take(&mut self.in_flight))
    }

    /// Wait for every report sent so far. Used when a caller needs the API
    /// to have seen them, e.g. before reloading the lecture list.
    pub async fn flush(&mut self) {
        self.take_in_flight().wait().await;
    }
}

/// Report tasks detached from a [`PlayerController`].
#[derive(Debug, Default)]
pub struct InFlightReports(Vec<JoinHandle<()>>);

impl InFlightReports {
    pub async fn wait(self) {
        for handle in self.0 {
            if let Err(err) = handle.await {
                warn!(error = %err, "progress report task failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skillforge_core::model::{
        CourseId, LectureId, LectureWithProgress, ProgressUpdate, WatchStatus,
    };
    use skillforge_core::playback::RecordingSurface;
    use std::sync::Mutex;
    use storage::repository::StorageError;
    use url::Url;

    #[derive(Default)]
    struct FailingProgress {
        attempts: Mutex<u32>,
    }

    #[async_trait]
    impl ProgressRepository for FailingProgress {
        async fn list_lectures(
            &self,
            _course_id: &CourseId,
        ) -> Result<Vec<LectureWithProgress>, StorageError> {
            Ok(Vec::new())
        }

        async fn update_progress(
            &self,
            _lecture_id: &LectureId,
            _update: ProgressUpdate,
        ) -> Result<(), StorageError> {
            *self.attempts.lock().unwrap() += 1;
            Err(StorageError::Connection("offline".into()))
        }
    }

    fn lecture() -> Lecture {
        Lecture::new(
            LectureId::new("l1").unwrap(),
            "Intro",
            100,
            Url::parse("https://cdn.example.com/l1.mp4").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn failed_reports_are_swallowed_and_not_retried() {
        let repo = Arc::new(FailingProgress::default());
        let reporter = ProgressReporter::new(repo.clone());
        let mut player = PlayerController::new(RecordingSurface::new(), lecture(), None, reporter);

        // 30% of a 20s lecture: the 25% threshold fires, the periodic window does not.
        player.on_time_update(6.0, 20.0);
        player.on_time_update(6.5, 20.0);
        player.flush().await;

        assert_eq!(*repo.attempts.lock().unwrap(), 1);
        assert_eq!(player.session().status(), WatchStatus::InProgress);
    }

    #[tokio::test]
    async fn refused_play_leaves_player_paused() {
        let reporter = ProgressReporter::new(Arc::new(FailingProgress::default()));
        let surface = RecordingSurface::new().rejecting_play("autoplay blocked");
        let mut player = PlayerController::new(surface, lecture(), None, reporter);
        assert!(!player.toggle_play());
        assert!(!player.session().is_playing());
    }

    #[tokio::test]
    async fn unsupported_fullscreen_keeps_windowed_state() {
        let reporter = ProgressReporter::new(Arc::new(FailingProgress::default()));
        let surface = RecordingSurface::new().without_fullscreen();
        let mut player = PlayerController::new(surface, lecture(), None, reporter);
        assert!(!player.toggle_fullscreen());
        assert!(!player.session().is_fullscreen());
    }
}
