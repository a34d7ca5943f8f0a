use thiserror::Error;
use url::Url;

/// Height of the video element while the player is windowed.
pub const WINDOWED_HEIGHT_PX: u32 = 480;

/// Vertical space kept for the custom controls in fullscreen.
pub const CONTROLS_RESERVED_PX: u32 = 120;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MediaError {
    #[error("playback was rejected: {0}")]
    PlaybackRejected(String),
    #[error("fullscreen is not supported by this host")]
    FullscreenUnsupported,
    #[error("fullscreen request failed: {0}")]
    FullscreenFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaHeight {
    Pixels(u32),
    /// Fill the viewport minus a strip kept for the controls.
    FillViewport { reserved_px: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectFit {
    /// Whatever the host does by default.
    #[default]
    Unset,
    /// Letterbox: keep the aspect ratio inside the box.
    Contain,
}

/// Display size and fit of the video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLayout {
    pub height: MediaHeight,
    pub fit: ObjectFit,
}

impl MediaLayout {
    #[must_use]
    pub fn windowed() -> Self {
        Self {
            height: MediaHeight::Pixels(WINDOWED_HEIGHT_PX),
            fit: ObjectFit::Unset,
        }
    }

    #[must_use]
    pub fn fullscreen() -> Self {
        Self {
            height: MediaHeight::FillViewport {
                reserved_px: CONTROLS_RESERVED_PX,
            },
            fit: ObjectFit::Contain,
        }
    }

    /// Inline style for web-based hosts.
    #[must_use]
    pub fn css(&self) -> String {
        let height = match self.height {
            MediaHeight::Pixels(px) => format!("height: {px}px;"),
            MediaHeight::FillViewport { reserved_px } => {
                format!("height: calc(100vh - {reserved_px}px);")
            }
        };
        match self.fit {
            ObjectFit::Unset => height,
            ObjectFit::Contain => format!("{height} object-fit: contain;"),
        }
    }
}

impl Default for MediaLayout {
    fn default() -> Self {
        Self::windowed()
    }
}

/// The media element a playback session drives.
///
/// Hosts forward the element's own events (metadata, time updates, pause,
/// end, fullscreen changes) back into the session. A host may still deliver
/// events from the previous source after `load_source`; the session drops
/// them until the new metadata arrives.
pub trait MediaSurface {
    /// Bind a new source and stop playback.
    fn load_source(&mut self, url: &Url);

    /// Start playback.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::PlaybackRejected` when the host refuses to play,
    /// e.g. because of an autoplay policy.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn seek(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f64);

    /// Make the player container (video and controls) fullscreen.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if the host cannot enter fullscreen.
    fn request_fullscreen(&mut self) -> Result<(), MediaError> {
        Err(MediaError::FullscreenUnsupported)
    }

    /// # Errors
    ///
    /// Returns `MediaError` if the host cannot leave fullscreen.
    fn exit_fullscreen(&mut self) -> Result<(), MediaError> {
        Err(MediaError::FullscreenUnsupported)
    }

    fn apply_layout(&mut self, layout: &MediaLayout);
}

/// Command observed by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Load(Url),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
    EnterFullscreen,
    ExitFullscreen,
    Layout(MediaLayout),
}

/// Headless surface that records every command it receives.
///
/// Useful for tests and for driving a session without a real player.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<SurfaceCommand>,
    reject_play: Option<String>,
    fullscreen_supported: bool,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            reject_play: None,
            fullscreen_supported: true,
        }
    }

    /// Make every `play` call fail with the given reason.
    #[must_use]
    pub fn rejecting_play(mut self, reason: impl Into<String>) -> Self {
        self.reject_play = Some(reason.into());
        self
    }

    #[must_use]
    pub fn without_fullscreen(mut self) -> Self {
        self.fullscreen_supported = false;
        self
    }

    #[must_use]
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Last layout applied, if any.
    #[must_use]
    pub fn last_layout(&self) -> Option<MediaLayout> {
        self.commands.iter().rev().find_map(|c| match c {
            SurfaceCommand::Layout(layout) => Some(*layout),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSurface for RecordingSurface {
    fn load_source(&mut self, url: &Url) {
        self.commands.push(SurfaceCommand::Load(url.clone()));
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if let Some(reason) = &self.reject_play {
            return Err(MediaError::PlaybackRejected(reason.clone()));
        }
        self.commands.push(SurfaceCommand::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.commands.push(SurfaceCommand::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.commands.push(SurfaceCommand::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.commands.push(SurfaceCommand::Volume(volume));
    }

    fn request_fullscreen(&mut self) -> Result<(), MediaError> {
        if !self.fullscreen_supported {
            return Err(MediaError::FullscreenUnsupported);
        }
        self.commands.push(SurfaceCommand::EnterFullscreen);
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), MediaError> {
        if !self.fullscreen_supported {
            return Err(MediaError::FullscreenUnsupported);
        }
        self.commands.push(SurfaceCommand::ExitFullscreen);
        Ok(())
    }

    fn apply_layout(&mut self, layout: &MediaLayout) {
        self.commands.push(SurfaceCommand::Layout(*layout));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_css() {
        assert_eq!(MediaLayout::windowed().css(), "height: 480px;");
        assert_eq!(
            MediaLayout::fullscreen().css(),
            "height: calc(100vh - 120px); object-fit: contain;"
        );
    }

    #[test]
    fn recording_surface_rejects_when_configured() {
        let mut surface = RecordingSurface::new().rejecting_play("autoplay blocked");
        let err = surface.play().unwrap_err();
        assert_eq!(err, MediaError::PlaybackRejected("autoplay blocked".into()));
        assert!(surface.commands().is_empty());
    }
}
