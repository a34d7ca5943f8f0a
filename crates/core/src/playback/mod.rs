//! Lecture playback: media surface control and progress reporting.

mod report;
mod session;
mod surface;
mod threshold;

pub use report::{
    PERIODIC_REPORT_INTERVAL_SECS, ProgressReport, ReportPolicy, ReportTrigger, watched_percent,
};
pub use session::PlaybackSession;
pub use surface::{
    CONTROLS_RESERVED_PX, MediaError, MediaHeight, MediaLayout, MediaSurface, ObjectFit,
    RecordingSurface, SurfaceCommand, WINDOWED_HEIGHT_PX,
};
pub use threshold::{Threshold, ThresholdSet};
