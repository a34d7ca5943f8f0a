use dioxus::prelude::document;
use skillforge_core::playback::{MediaError, MediaLayout, MediaSurface};
use url::Url;

use super::scripts::{
    exit_fullscreen_script, layout_script, load_source_script, pause_script, play_script,
    request_fullscreen_script, seek_script, volume_script,
};

/// `<video>` element in the webview, driven by evaluated scripts.
///
/// Every call is fire-and-forget. Refusals that only the page can observe
/// (autoplay policy, fullscreen denial) come back as bridge events.
#[derive(Debug, Clone)]
pub struct WebMediaSurface {
    video_id: String,
    container_id: String,
}

impl WebMediaSurface {
    #[must_use]
    pub fn new(video_id: impl Into<String>, container_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            container_id: container_id.into(),
        }
    }

    fn run(script: &str) {
        let _ = document::eval(script);
    }
}

impl MediaSurface for WebMediaSurface {
    fn load_source(&mut self, url: &Url) {
        Self::run(&load_source_script(&self.video_id, url.as_str()));
    }

    fn play(&mut self) -> Result<(), MediaError> {
        Self::run(&play_script(&self.video_id));
        Ok(())
    }

    fn pause(&mut self) {
        Self::run(&pause_script(&self.video_id));
    }

    fn seek(&mut self, seconds: f64) {
        Self::run(&seek_script(&self.video_id, seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        Self::run(&volume_script(&self.video_id, volume));
    }

    fn request_fullscreen(&mut self) -> Result<(), MediaError> {
        Self::run(&request_fullscreen_script(&self.container_id));
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), MediaError> {
        Self::run(&exit_fullscreen_script());
        Ok(())
    }

    fn apply_layout(&mut self, layout: &MediaLayout) {
        Self::run(&layout_script(&self.video_id, &layout.css()));
    }
}
