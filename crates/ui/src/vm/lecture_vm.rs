use skillforge_core::model::{LectureId, LectureListFilter, LectureWithProgress, WatchStatus};

use crate::vm::time_fmt::format_clock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LectureRowVm {
    pub id: LectureId,
    pub title: String,
    pub duration_label: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub selected: bool,
}

#[must_use]
pub fn status_label(status: WatchStatus) -> &'static str {
    match status {
        WatchStatus::NotStarted => "Not started",
        WatchStatus::InProgress => "In progress",
        WatchStatus::Paused => "Paused",
        WatchStatus::Completed => "Watched",
    }
}

/// Rows for one tab of the lecture list.
#[must_use]
pub fn map_lecture_rows(
    lectures: &[LectureWithProgress],
    filter: LectureListFilter,
    selected: Option<&LectureId>,
) -> Vec<LectureRowVm> {
    filter
        .apply(lectures)
        .into_iter()
        .map(|item| {
            let status = item.status();
            LectureRowVm {
                id: item.lecture.id().clone(),
                title: item.lecture.title().to_owned(),
                duration_label: format_clock(item.lecture.duration_seconds()),
                status_label: status_label(status),
                status_class: status.as_str(),
                selected: selected == Some(item.lecture.id()),
            }
        })
        .collect()
}

#[must_use]
pub fn tab_label(filter: LectureListFilter) -> &'static str {
    match filter {
        LectureListFilter::All => "All Lectures",
        LectureListFilter::Started => "In Progress / Watched",
    }
}

/// `3 of 5 watched`.
#[must_use]
pub fn completion_summary(lectures: &[LectureWithProgress]) -> String {
    let done = lectures
        .iter()
        .filter(|l| l.status().is_completed())
        .count();
    format!("{done} of {} watched", lectures.len())
}
