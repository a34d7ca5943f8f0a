use std::sync::Arc;

use async_trait::async_trait;
use services::{AppServices, CertificateError};
use skillforge_core::certificate::{CERTIFICATE_HEIGHT, CERTIFICATE_WIDTH};
use skillforge_core::model::{
    Course, CourseId, Lecture, LectureId, LectureWithProgress, ProgressUpdate, UserProfile,
    WatchProgress, WatchStatus,
};
use skillforge_core::time::fixed_clock;
use storage::repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
use url::Url;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn repo_with_course(statuses: &[WatchStatus]) -> (InMemoryRepository, CourseId) {
    let repo = InMemoryRepository::new();
    let course_id = CourseId::new("42").unwrap();
    let course = Course::new(course_id.clone(), "Rust for Beginners")
        .unwrap()
        .with_instructor("Ferris");
    repo.insert_course(course).unwrap();
    for (i, status) in statuses.iter().enumerate() {
        let lecture_id = LectureId::new(format!("l{i}")).unwrap();
        let lecture = Lecture::new(
            lecture_id.clone(),
            format!("Lecture {i}"),
            300,
            Url::parse("https://cdn.example.com/v.mp4").unwrap(),
        )
        .unwrap();
        repo.insert_lecture(&course_id, lecture).unwrap();
        repo.set_progress(WatchProgress::new(lecture_id, *status, 300))
            .unwrap();
    }
    repo.set_current_profile(Some(UserProfile::new(Some("Jane X. Doe!".into()), None)))
        .unwrap();
    (repo, course_id)
}

struct ProgressDown;

#[async_trait]
impl ProgressRepository for ProgressDown {
    async fn list_lectures(
        &self,
        _course_id: &CourseId,
    ) -> Result<Vec<LectureWithProgress>, StorageError> {
        Err(StorageError::Connection("progress endpoint down".into()))
    }

    async fn update_progress(
        &self,
        _lecture_id: &LectureId,
        _update: ProgressUpdate,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("progress endpoint down".into()))
    }
}

async fn held_lectures(services: &AppServices, course_id: &CourseId) -> Vec<LectureWithProgress> {
    services.lectures().load(course_id).await.unwrap().lectures
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[tokio::test]
async fn completed_course_yields_named_png() {
    let (repo, course_id) = repo_with_course(&[WatchStatus::Completed, WatchStatus::Completed]);
    let services = AppServices::from_storage(Storage::from_memory(repo), fixed_clock(), "SkillForge");

    let lectures = held_lectures(&services, &course_id).await;
    let file = services
        .certificates()
        .issue(&course_id, &lectures)
        .await
        .unwrap();
    assert_eq!(file.file_name, "certificate-jane_x__doe_-42.png");
    assert_eq!(file.png[..8], PNG_SIGNATURE);
    // IHDR starts right after the signature and chunk header.
    assert_eq!(be_u32(&file.png[16..20]), CERTIFICATE_WIDTH);
    assert_eq!(be_u32(&file.png[20..24]), CERTIFICATE_HEIGHT);
}

#[tokio::test]
async fn unfinished_course_is_refused() {
    let (repo, course_id) = repo_with_course(&[WatchStatus::Completed, WatchStatus::InProgress]);
    let services = AppServices::from_storage(Storage::from_memory(repo), fixed_clock(), "SkillForge");

    let lectures = held_lectures(&services, &course_id).await;
    let err = services
        .certificates()
        .issue(&course_id, &lectures)
        .await
        .unwrap_err();
    assert!(matches!(err, CertificateError::NotEligible(id) if id == course_id));
}

#[tokio::test]
async fn signed_out_user_gets_a_storage_error() {
    let (repo, course_id) = repo_with_course(&[WatchStatus::Completed]);
    let services = AppServices::from_storage(Storage::from_memory(repo.clone()), fixed_clock(), "SkillForge");
    let lectures = held_lectures(&services, &course_id).await;
    repo.set_current_profile(None).unwrap();

    let err = services
        .certificates()
        .issue(&course_id, &lectures)
        .await
        .unwrap_err();
    assert!(matches!(err, CertificateError::Storage(_)));
}

#[tokio::test]
async fn claim_uses_the_held_list_when_progress_is_unreachable() {
    let (repo, course_id) = repo_with_course(&[WatchStatus::Completed, WatchStatus::Completed]);
    let healthy = AppServices::from_storage(Storage::from_memory(repo.clone()), fixed_clock(), "SkillForge");
    let lectures = held_lectures(&healthy, &course_id).await;

    let mut storage = Storage::from_memory(repo);
    storage.progress = Arc::new(ProgressDown);
    let services = AppServices::from_storage(storage, fixed_clock(), "SkillForge");

    let file = services
        .certificates()
        .issue(&course_id, &lectures)
        .await
        .unwrap();
    assert_eq!(file.png[..8], PNG_SIGNATURE);
}

#[tokio::test]
async fn empty_course_is_never_eligible() {
    let (repo, course_id) = repo_with_course(&[]);
    let services = AppServices::from_storage(Storage::from_memory(repo), fixed_clock(), "SkillForge");

    let err = services
        .certificates()
        .issue(&course_id, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, CertificateError::NotEligible(_)));
}
