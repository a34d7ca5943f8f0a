mod catalog;
mod course;
mod learn;
mod login;
mod my_courses;
mod player;
mod reviews;
mod state;
mod toast;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use catalog::CatalogView;
pub use course::CourseView;
pub use learn::LearnView;
pub use login::LoginView;
pub use my_courses::MyCoursesView;
pub use player::{PlayerPanel, WebMediaSurface, WebPlayer};
pub use reviews::{CourseFeedback, MyReviewsView, PostReviewView};
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use toast::{Toast, ToastHost, ToastKind};
