//! Scripts evaluated in the webview to drive the `<video>` element.
//!
//! Only the bridge script talks back to Rust. Command scripts report late
//! failures through `window.__skillforgePlayer.send`, which the bridge sets.

pub(super) const VIDEO_ID: &str = "lecture-video";
pub(super) const CONTAINER_ID: &str = "player-container";

pub(super) fn bridge_script(video_id: &str, container_id: &str) -> String {
    format!(
        r#"(function() {{
            const videoId = {video_id:?};
            const containerId = {container_id:?};
            const player = window.__skillforgePlayer || (window.__skillforgePlayer = {{}});
            player.send = (msg) => dioxus.send(msg);
            const attach = () => {{
                const video = document.getElementById(videoId);
                if (!video) {{
                    requestAnimationFrame(attach);
                    return;
                }}
                if (video.__skillforgeBound) {{
                    player.send({{ kind: "ready" }});
                    return;
                }}
                video.__skillforgeBound = true;
                video.addEventListener("loadedmetadata", () => {{
                    video.__skillforgeSwapping = false;
                    player.send({{ kind: "metadata", duration: video.duration || 0 }});
                }});
                video.addEventListener("timeupdate", () => {{
                    if (video.__skillforgeSwapping) return;
                    player.send({{
                        kind: "time",
                        current: video.currentTime || 0,
                        duration: video.duration || 0,
                    }});
                }});
                video.addEventListener("pause", () => {{
                    if (video.ended || video.__skillforgeSwapping) return;
                    player.send({{ kind: "pause", current: video.currentTime || 0 }});
                }});
                video.addEventListener("ended", () => {{
                    player.send({{ kind: "ended" }});
                }});
                document.addEventListener("fullscreenchange", () => {{
                    const el = document.fullscreenElement;
                    player.send({{ kind: "fullscreen", entering: !!el && el.id === containerId }});
                }});
                player.send({{ kind: "ready" }});
            }};
            attach();
        }})();
        await new Promise(() => {{}});"#,
    )
}

fn with_video(video_id: &str, body: &str) -> String {
    format!(
        r#"(function() {{
            const video = document.getElementById({video_id:?});
            if (!video) return;
            {body}
        }})();"#,
    )
}

pub(super) fn load_source_script(video_id: &str, url: &str) -> String {
    with_video(
        video_id,
        &format!(
            "video.__skillforgeSwapping = true; video.pause(); video.src = {url:?}; video.load();"
        ),
    )
}

pub(super) fn play_script(video_id: &str) -> String {
    with_video(
        video_id,
        r#"const pending = video.play();
            if (pending && pending.catch) {
                pending.catch((err) => {
                    const player = window.__skillforgePlayer;
                    if (player && player.send) {
                        player.send({ kind: "play_rejected", reason: String(err && err.name || err) });
                    }
                });
            }"#,
    )
}

pub(super) fn pause_script(video_id: &str) -> String {
    with_video(video_id, "video.pause();")
}

pub(super) fn seek_script(video_id: &str, seconds: f64) -> String {
    with_video(video_id, &format!("video.currentTime = {seconds};"))
}

pub(super) fn volume_script(video_id: &str, volume: f64) -> String {
    with_video(video_id, &format!("video.volume = {volume};"))
}

pub(super) fn layout_script(video_id: &str, css: &str) -> String {
    with_video(video_id, &format!("video.style.cssText = {css:?};"))
}

pub(super) fn request_fullscreen_script(container_id: &str) -> String {
    format!(
        r#"(function() {{
            const fail = (reason) => {{
                const player = window.__skillforgePlayer;
                if (player && player.send) player.send({{ kind: "fullscreen_failed", reason }});
            }};
            const container = document.getElementById({container_id:?});
            if (!container || !container.requestFullscreen) {{
                fail("fullscreen is not available");
                return;
            }}
            container.requestFullscreen().catch((err) => fail(String(err && err.name || err)));
        }})();"#,
    )
}

pub(super) fn exit_fullscreen_script() -> String {
    r"(function() {
        if (document.fullscreenElement && document.exitFullscreen) {
            document.exitFullscreen().catch(() => {});
        }
    })();"
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_values_are_quoted() {
        let js = load_source_script(VIDEO_ID, "https://cdn.example.com/a \"b\".mp4");
        assert!(js.contains(r#"getElementById("lecture-video")"#));
        assert!(js.contains(r#"video.src = "https://cdn.example.com/a \"b\".mp4""#));
        assert!(seek_script(VIDEO_ID, 42.5).contains("video.currentTime = 42.5;"));
    }

    #[test]
    fn bridge_reports_fullscreen_for_the_container_only() {
        let js = bridge_script(VIDEO_ID, CONTAINER_ID);
        assert!(js.contains(r#"const containerId = "player-container";"#));
        assert!(js.contains("kind: \"ended\""));
    }

    #[test]
    fn source_swap_mutes_old_media_events_until_metadata() {
        let load = load_source_script(VIDEO_ID, "https://cdn.example.com/b.mp4");
        let flag = load.find("__skillforgeSwapping = true").unwrap();
        assert!(flag < load.find("video.pause()").unwrap());

        let bridge = bridge_script(VIDEO_ID, CONTAINER_ID);
        assert!(bridge.contains("if (video.ended || video.__skillforgeSwapping) return;"));
        assert!(bridge.contains("video.__skillforgeSwapping = false;"));
    }
}
