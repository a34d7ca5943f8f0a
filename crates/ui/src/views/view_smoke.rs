use skillforge_core::model::{Course, CourseId, LectureId, UserProfile, WatchProgress, WatchStatus};
use storage::repository::InMemoryRepository;

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_repo};

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_lists_demo_courses() {
    let mut harness = setup_view_harness(ViewKind::Catalog);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Rust from Scratch"), "missing course in {html}");
    assert!(html.contains("Watercolor Basics"), "missing course in {html}");
    assert!(html.contains("All categories"), "missing category select in {html}");
    assert!(html.contains("$19.00"), "missing price in {html}");
    assert!(html.contains("Free"), "missing free label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_smoke_offers_continue_when_enrolled() {
    let mut harness = setup_view_harness(ViewKind::Course("rust-101".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Continue learning"), "missing learn link in {html}");
    assert!(html.contains("By Ferris Crab"), "missing instructor in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_smoke_shows_ratings_and_feedback() {
    let mut harness = setup_view_harness(ViewKind::Course("rust-101".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Ratings breakdown"), "missing breakdown in {html}");
    assert!(html.contains("2 ratings"), "missing rating count in {html}");
    assert!(html.contains("4.5"), "missing average in {html}");
    assert!(html.contains("Sam Okafor"), "missing review author in {html}");
    assert!(html.contains("Leave a review"), "missing review link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_smoke_offers_enrollment_otherwise() {
    let mut harness = setup_view_harness(ViewKind::Course("watercolor".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Enroll now"), "missing enroll button in {html}");
    assert!(html.contains("Art"), "missing category in {html}");
    assert!(html.contains("1 rating"), "missing rating count in {html}");
    assert!(!html.contains("Leave a review"), "review offered before enrolling: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_smoke_reports_unknown_course() {
    let mut harness = setup_view_harness(ViewKind::Course("nope".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("find that course"), "missing not found text in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_smoke_lists_lectures_with_tabs() {
    let mut harness = setup_view_harness(ViewKind::Learn("rust-101".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("All Lectures"), "missing tab in {html}");
    assert!(html.contains("In Progress / Watched"), "missing tab in {html}");
    assert!(html.contains("1 of 3 watched"), "missing summary in {html}");
    assert!(html.contains("9:56"), "missing m:ss duration in {html}");
    assert!(html.contains("lecture-video"), "missing player in {html}");
    assert!(!html.contains("Claim Certificate"), "claim shown too early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_smoke_offers_certificate_once_complete() {
    let repo = InMemoryRepository::with_demo_data().unwrap();
    for id in ["rust-101-2", "rust-101-3"] {
        repo.set_progress(WatchProgress::new(
            LectureId::new(id).unwrap(),
            WatchStatus::Completed,
            596,
        ))
        .unwrap();
    }
    let mut harness = setup_view_harness_with_repo(ViewKind::Learn("rust-101".into()), repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("3 of 3 watched"), "missing summary in {html}");
    assert!(html.contains("Claim Certificate"), "missing claim button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_smoke_handles_empty_course() {
    let repo = InMemoryRepository::new();
    repo.insert_course(Course::new(CourseId::new("empty").unwrap(), "Empty").unwrap())
        .unwrap();
    repo.set_current_profile(Some(UserProfile::new(Some("Ada".into()), None)))
        .unwrap();
    let mut harness = setup_view_harness_with_repo(ViewKind::Learn("empty".into()), repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("no lectures yet"), "missing empty text in {html}");
    assert!(!html.contains("Claim Certificate"), "empty course must not be claimable: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("login-email"), "missing email field in {html}");
    assert!(html.contains("Need an account? Sign up"), "missing mode switch in {html}");
    assert!(harness.opener.opened.lock().unwrap().is_empty());
    assert!(harness.services.session().is_signed_in());
}

#[tokio::test(flavor = "current_thread")]
async fn post_review_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::PostReview("rust-101".into()));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Leave a review"), "missing heading in {html}");
    assert!(html.contains("5 stars"), "missing rating options in {html}");
    assert!(html.contains("1 star"), "missing rating options in {html}");
    assert!(html.contains("Skip review"), "missing skip link in {html}");
    assert!(html.contains("Post review"), "missing submit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn my_reviews_view_smoke_starts_empty() {
    let mut harness = setup_view_harness(ViewKind::MyReviews);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Your Reviews"), "missing heading in {html}");
    assert!(html.contains("any reviews yet"), "missing empty text in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn my_reviews_view_smoke_lists_posted_review() {
    let mut harness = setup_view_harness(ViewKind::MyReviews);
    let course = CourseId::new("watercolor").unwrap();
    harness
        .services
        .reviews()
        .post(&course, 4, "")
        .await
        .unwrap();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("★★★★☆"), "missing stars in {html}");
    assert!(html.contains("(No review text)"), "missing placeholder in {html}");
    assert!(html.contains("Watercolor Basics"), "missing course title in {html}");
    assert!(html.contains("Delete"), "missing delete action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn my_courses_view_smoke_lists_enrollments() {
    let mut harness = setup_view_harness(ViewKind::MyCourses);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Enrolled Courses"), "missing heading in {html}");
    assert!(html.contains("Rust from Scratch"), "missing course in {html}");
    assert!(html.contains("Paid: Free"), "missing amount in {html}");
    assert!(html.contains("Open course"), "missing learn link in {html}");
    assert!(!html.contains("Watercolor Basics"), "unpaid course listed in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn my_courses_view_smoke_asks_to_sign_in() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness_with_repo(ViewKind::MyCourses, repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Please sign in"), "missing sign-in prompt in {html}");
}
