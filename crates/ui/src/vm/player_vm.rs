use serde::Deserialize;
use skillforge_core::model::LectureWithProgress;
use skillforge_core::playback::{MediaError, MediaSurface, PlaybackSession};
use services::PlayerController;

use crate::vm::time_fmt::format_position;

/// Messages posted by the media bridge script.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaEvent {
    /// The video element exists and listeners are attached.
    Ready,
    Metadata { duration: f64 },
    Time { current: f64, duration: f64 },
    Pause { current: f64 },
    Ended,
    Fullscreen { entering: bool },
    PlayRejected { reason: String },
    FullscreenFailed { reason: String },
}

/// What the view has to do after an event was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEffect {
    None,
    /// Playback reached the end; the lecture list should be reloaded.
    LectureFinished,
}

/// Feed one bridge event into the controller.
pub fn apply_media_event<M: MediaSurface>(
    player: &mut PlayerController<M>,
    event: MediaEvent,
) -> PlayerEffect {
    match event {
        MediaEvent::Ready => {}
        MediaEvent::Metadata { duration } => {
            player.on_loaded_metadata(duration);
        }
        MediaEvent::Time { current, duration } => player.on_time_update(current, duration),
        MediaEvent::Pause { current } => player.on_pause(current),
        MediaEvent::Ended => {
            player.on_ended();
            return PlayerEffect::LectureFinished;
        }
        MediaEvent::Fullscreen { entering } => player.on_fullscreen_change(entering),
        MediaEvent::PlayRejected { reason } => {
            player.on_play_rejected(&MediaError::PlaybackRejected(reason));
        }
        MediaEvent::FullscreenFailed { reason } => {
            tracing::warn!(%reason, "fullscreen request failed");
            player.on_fullscreen_change(false);
        }
    }
    PlayerEffect::None
}

/// A freshly mounted element has no source; point the existing controller
/// back at the open lecture. The new element is never fullscreen.
pub fn rebind_player<M: MediaSurface>(
    player: &mut PlayerController<M>,
    current: &LectureWithProgress,
) {
    player.on_fullscreen_change(false);
    player.load_lecture(current.lecture.clone(), current.progress.as_ref());
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerVm {
    pub title: String,
    pub position_label: String,
    pub duration_label: String,
    pub position: f64,
    pub duration: f64,
    pub volume: f64,
    pub is_playing: bool,
    pub is_fullscreen: bool,
    pub video_style: String,
}

impl PlayerVm {
    #[must_use]
    pub fn from_session<M: MediaSurface>(session: &PlaybackSession<M>) -> Self {
        Self {
            title: session.lecture().title().to_owned(),
            position_label: format_position(session.current_time()),
            duration_label: format_position(session.duration()),
            position: session.current_time(),
            duration: session.duration(),
            volume: session.volume(),
            is_playing: session.is_playing(),
            is_fullscreen: session.is_fullscreen(),
            video_style: session.layout().css(),
        }
    }

    #[must_use]
    pub fn play_label(&self) -> &'static str {
        if self.is_playing { "Pause" } else { "Play" }
    }

    #[must_use]
    pub fn fullscreen_label(&self) -> &'static str {
        if self.is_fullscreen {
            "Exit fullscreen"
        } else {
            "Fullscreen"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use services::ProgressReporter;
    use skillforge_core::model::{Lecture, LectureId, WatchProgress, WatchStatus};
    use skillforge_core::playback::{RecordingSurface, SurfaceCommand};
    use storage::repository::InMemoryRepository;
    use url::Url;

    fn player() -> PlayerController<RecordingSurface> {
        let lecture = Lecture::new(
            LectureId::new("l1").unwrap(),
            "Intro",
            100,
            Url::parse("https://cdn.example.com/l1.mp4").unwrap(),
        )
        .unwrap();
        let reporter = ProgressReporter::new(Arc::new(InMemoryRepository::new()));
        PlayerController::new(RecordingSurface::new(), lecture, None, reporter)
    }

    #[test]
    fn bridge_messages_decode() {
        let event: MediaEvent =
            serde_json::from_str(r#"{"kind":"time","current":12.5,"duration":100}"#).unwrap();
        assert_eq!(
            event,
            MediaEvent::Time {
                current: 12.5,
                duration: 100.0
            }
        );
        let event: MediaEvent =
            serde_json::from_str(r#"{"kind":"play_rejected","reason":"NotAllowedError"}"#)
                .unwrap();
        assert!(matches!(event, MediaEvent::PlayRejected { .. }));
    }

    #[tokio::test]
    async fn ended_asks_for_a_reload() {
        let mut player = player();
        assert_eq!(
            apply_media_event(&mut player, MediaEvent::Metadata { duration: 100.0 }),
            PlayerEffect::None
        );
        assert_eq!(
            apply_media_event(&mut player, MediaEvent::Ended),
            PlayerEffect::LectureFinished
        );
        player.flush().await;
        assert_eq!(player.session().status(), WatchStatus::Completed);
    }

    #[tokio::test]
    async fn host_exit_restores_windowed_layout() {
        let mut player = player();
        apply_media_event(&mut player, MediaEvent::Fullscreen { entering: true });
        let vm = PlayerVm::from_session(player.session());
        assert!(vm.is_fullscreen);
        assert!(vm.video_style.contains("object-fit: contain"));

        apply_media_event(&mut player, MediaEvent::Fullscreen { entering: false });
        let vm = PlayerVm::from_session(player.session());
        assert_eq!(vm.fullscreen_label(), "Fullscreen");
        assert_eq!(vm.video_style, "height: 480px;");
    }

    #[tokio::test]
    async fn remounted_element_gets_the_open_lecture_again() {
        let mut player = player();
        apply_media_event(&mut player, MediaEvent::Metadata { duration: 100.0 });
        apply_media_event(&mut player, MediaEvent::Fullscreen { entering: true });
        apply_media_event(&mut player, MediaEvent::Ended);
        player.flush().await;

        let lecture = player.session().lecture().clone();
        let progress = WatchProgress::new(lecture.id().clone(), WatchStatus::Completed, 100);
        let current = LectureWithProgress::new(lecture.clone(), Some(progress));
        rebind_player(&mut player, &current);

        assert!(!player.session().is_fullscreen());
        assert!(
            player
                .session()
                .surface()
                .commands()
                .ends_with(&[SurfaceCommand::Load(lecture.media_url().clone()), SurfaceCommand::Pause])
        );
        assert_eq!(
            apply_media_event(&mut player, MediaEvent::Metadata { duration: 100.0 }),
            PlayerEffect::None
        );
        assert_eq!(player.session().current_time(), 99.0);
    }
}
