//! Unit tests for the in-memory registration repository

use chrono::{Duration, Utc};

use crate::domain::entities::{Attendance, Registration, RequestProvenance};
use crate::domain::value_objects::{AttendanceStatus, VerificationMethod};
use crate::errors::DomainError;
use crate::repositories::registration::{
    AssignTokenOutcome, CheckOutOutcome, InMemoryRegistrationRepository,
    RegistrationRepository, TokenAssignment, VerificationCompletion,
};

fn registration(id: i64, event_id: i64) -> Registration {
    Registration::new(id, event_id, id * 100, format!("REG-{:04}", id), Utc::now())
}

fn assignment(token: &str) -> TokenAssignment {
    let now = Utc::now();
    TokenAssignment {
        token: token.to_string(),
        generated_at: now,
        expires_at: Some(now + Duration::days(1)),
    }
}

fn completion(reg: &Registration) -> VerificationCompletion {
    let now = Utc::now();
    VerificationCompletion {
        registration_id: reg.id,
        verified_at: now,
        method: VerificationMethod::Token,
        expected_token: reg.attendance_token.clone(),
        attendance: Attendance::for_registration(reg, now, RequestProvenance::default()),
    }
}

#[tokio::test]
async fn test_insert_and_find() {
    let repo = InMemoryRegistrationRepository::new();
    repo.insert(registration(1, 10)).await.unwrap();

    let found = repo.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(found.event_id, 10);
    assert!(repo.find_by_id(2).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_returns_stored_registration() {
    let repo = InMemoryRegistrationRepository::new();
    let created = repo.create(registration(1, 10)).await.unwrap();
    assert_eq!(repo.find_by_id(1).await.unwrap(), Some(created));

    let duplicate = repo.create(registration(1, 10)).await;
    assert!(matches!(duplicate, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_insert_rejects_duplicate_token() {
    let repo = InMemoryRegistrationRepository::new();
    let mut first = registration(1, 10);
    first.attendance_token = Some("0123456789".to_string());
    let mut second = registration(2, 11);
    second.attendance_token = Some("0123456789".to_string());

    repo.insert(first).await.unwrap();
    let result = repo.insert(second).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_assign_token_sets_token_fields() {
    let repo = InMemoryRegistrationRepository::new();
    repo.insert(registration(1, 10)).await.unwrap();

    let outcome = repo.assign_token(1, assignment("0000000042")).await.unwrap();
    let AssignTokenOutcome::Assigned(reg) = outcome else {
        panic!("expected assignment");
    };
    assert_eq!(reg.attendance_token.as_deref(), Some("0000000042"));
    assert_eq!(reg.attendance_status, AttendanceStatus::Pending);
    assert_eq!(reg.verification_method, Some(VerificationMethod::Token));
    assert!(repo.token_exists("0000000042").await.unwrap());
    assert_eq!(
        repo.find_by_token("0000000042").await.unwrap().map(|r| r.id),
        Some(1)
    );
}

#[tokio::test]
async fn test_assign_token_conflict_across_events() {
    let repo = InMemoryRegistrationRepository::new();
    repo.insert(registration(1, 10)).await.unwrap();
    repo.insert(registration(2, 20)).await.unwrap();

    repo.assign_token(1, assignment("5555555555")).await.unwrap();
    let outcome = repo.assign_token(2, assignment("5555555555")).await.unwrap();
    assert_eq!(outcome, AssignTokenOutcome::Conflict);

    let second = repo.find_by_id(2).await.unwrap().unwrap();
    assert!(second.attendance_token.is_none());
}

#[tokio::test]
async fn test_replacing_token_releases_old_value() {
    let repo = InMemoryRegistrationRepository::new();
    repo.insert(registration(1, 10)).await.unwrap();

    repo.assign_token(1, assignment("1111111111")).await.unwrap();
    repo.assign_token(1, assignment("2222222222")).await.unwrap();

    assert!(!repo.token_exists("1111111111").await.unwrap());
    assert!(repo.token_exists("2222222222").await.unwrap());
    assert_eq!(repo.tokens().await, vec!["2222222222".to_string()]);
}

#[tokio::test]
async fn test_assign_token_missing_registration() {
    let repo = InMemoryRegistrationRepository::new();
    let outcome = repo.assign_token(99, assignment("1234512345")).await.unwrap();
    assert_eq!(outcome, AssignTokenOutcome::NotFound);
}

#[tokio::test]
async fn test_complete_verification_is_single_use() {
    let repo = InMemoryRegistrationRepository::new();
    let reg = registration(1, 10);
    repo.insert(reg.clone()).await.unwrap();

    let first = repo.complete_verification(completion(&reg)).await.unwrap();
    let verified = first.expect("first completion applies");
    assert_eq!(verified.registration.attendance_status, AttendanceStatus::Present);
    assert!(verified.registration.is_consistent());

    let second = repo.complete_verification(completion(&reg)).await.unwrap();
    assert!(second.is_none());
    assert_eq!(repo.attendance_count(1).await, 1);
}

#[tokio::test]
async fn test_complete_verification_requires_current_token() {
    let repo = InMemoryRegistrationRepository::new();
    repo.insert(registration(1, 10)).await.unwrap();
    let AssignTokenOutcome::Assigned(stale) =
        repo.assign_token(1, assignment("1111111111")).await.unwrap()
    else {
        panic!("expected assignment");
    };
    repo.assign_token(1, assignment("2222222222")).await.unwrap();

    let outcome = repo.complete_verification(completion(&stale)).await.unwrap();
    assert!(outcome.is_none());
    assert_eq!(repo.attendance_count(1).await, 0);
    let current = repo.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(current.attendance_status, AttendanceStatus::Pending);

    let mut manual = completion(&current);
    manual.method = VerificationMethod::Manual;
    manual.expected_token = None;
    assert!(repo.complete_verification(manual).await.unwrap().is_some());
}

#[tokio::test]
async fn test_assign_token_after_verification_is_refused() {
    let repo = InMemoryRegistrationRepository::new();
    let reg = registration(1, 10);
    repo.insert(reg.clone()).await.unwrap();
    repo.complete_verification(completion(&reg)).await.unwrap();

    let outcome = repo.assign_token(1, assignment("3333333333")).await.unwrap();
    assert_eq!(outcome, AssignTokenOutcome::AlreadyVerified);
}

#[tokio::test]
async fn test_certificate_requires_verification() {
    let repo = InMemoryRegistrationRepository::new();
    let reg = registration(1, 10);
    repo.insert(reg.clone()).await.unwrap();

    assert!(repo.mark_certificate_received(1, Utc::now()).await.unwrap().is_none());

    repo.complete_verification(completion(&reg)).await.unwrap();
    let issued = repo.mark_certificate_received(1, Utc::now()).await.unwrap();
    assert!(issued.unwrap().has_received_certificate);

    assert!(repo.mark_certificate_received(1, Utc::now()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_check_out_once() {
    let repo = InMemoryRegistrationRepository::new();
    let reg = registration(1, 10);
    repo.insert(reg.clone()).await.unwrap();

    assert_eq!(
        repo.record_check_out(1, Utc::now()).await.unwrap(),
        CheckOutOutcome::NotCheckedIn
    );

    repo.complete_verification(completion(&reg)).await.unwrap();
    let outcome = repo.record_check_out(1, Utc::now()).await.unwrap();
    assert!(matches!(outcome, CheckOutOutcome::Recorded(a) if a.time_out.is_some()));

    assert_eq!(
        repo.record_check_out(1, Utc::now()).await.unwrap(),
        CheckOutOutcome::AlreadyCheckedOut
    );
}

#[tokio::test]
async fn test_absentees_and_summary() {
    let repo = InMemoryRegistrationRepository::new();
    let present = registration(1, 10);
    repo.insert(present.clone()).await.unwrap();
    repo.insert(registration(2, 10)).await.unwrap();
    repo.insert(registration(3, 10)).await.unwrap();
    repo.insert(registration(4, 20)).await.unwrap();

    repo.complete_verification(completion(&present)).await.unwrap();
    repo.mark_certificate_received(1, Utc::now()).await.unwrap();

    let marked = repo.mark_pending_as_absent(10, Utc::now()).await.unwrap();
    assert_eq!(marked, 2);

    let summary = repo.summarize_event(10).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.absent, 2);
    assert_eq!(summary.pending, 0);
    assert_eq!(summary.certificates_issued, 1);

    let other = repo.summarize_event(20).await.unwrap();
    assert_eq!(other.pending, 1);
}

#[tokio::test]
async fn test_unavailable_store() {
    let repo = InMemoryRegistrationRepository::new();
    repo.set_unavailable(true);

    let result = repo.find_by_id(1).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));

    repo.set_unavailable(false);
    assert!(repo.find_by_id(1).await.unwrap().is_none());
}
