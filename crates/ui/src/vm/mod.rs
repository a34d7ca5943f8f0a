mod catalog_vm;
mod course_vm;
mod lecture_vm;
mod player_vm;
mod review_vm;
mod time_fmt;

pub use catalog_vm::{
    ALL_CATEGORIES, CategoryOptionVm, CourseCardVm, category_options, map_course_cards,
};
pub use course_vm::{CourseDetailVm, checkout_session_id};
pub use lecture_vm::{
    LectureRowVm, completion_summary, map_lecture_rows, status_label, tab_label,
};
pub use player_vm::{MediaEvent, PlayerEffect, PlayerVm, apply_media_event, rebind_player};
pub use review_vm::{
    EnrolledCourseVm, FEEDBACK_PREVIEW, RatingOptionVm, RatingRowVm, RatingSummaryVm,
    ReviewCardVm, map_enrolled_courses, map_review_cards, rating_options, star_glyphs,
};
pub use time_fmt::{format_clock, format_position, format_price};
