use std::process::Command;

use tracing::warn;

use super::UiLinkOpener;

/// Hands URLs to the system browser.
pub struct DesktopLinkOpener;

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        let spawned = if cfg!(target_os = "macos") {
            Command::new("open").arg(url).spawn()
        } else if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        } else {
            Command::new("xdg-open").arg(url).spawn()
        };
        if let Err(err) = spawned {
            warn!(%url, error = %err, "could not open browser");
        }
    }
}
