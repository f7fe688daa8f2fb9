//! Integration tests for the SQLite store against a database file
//!
//! The inline unit tests cover the in-memory connection; these verify
//! behavior against a real file, including persistence across reopen.

use caresync::adapters::store::{RecordStore, SqliteStore};
use caresync::domain::{
    Appointment, AppointmentId, AppointmentStatus, Nurse, NurseId, Patient, PatientId,
};
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn nurse(id: &str, name: &str) -> Nurse {
    Nurse {
        id: NurseId::new(id).unwrap(),
        name: name.to_string(),
        title: "RN".to_string(),
        specialty: "Home Health".to_string(),
        phone: Some("555-0100".to_string()),
        email: None,
    }
}

fn patient(id: &str) -> Patient {
    Patient {
        id: PatientId::new(id).unwrap(),
        name: "Test Patient".to_string(),
        phone: None,
        email: Some("patient@example.com".to_string()),
        care_needs: vec!["Wound Care".to_string(), "Diet: Low Sodium".to_string()],
        medical_notes: Some("Post-op".to_string()),
    }
}

fn appointment(id: &str) -> Appointment {
    let start = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    Appointment {
        id: AppointmentId::new(id).unwrap(),
        patient_id: Some(PatientId::new("p1").unwrap()),
        nurse_id: Some(NurseId::new("n1").unwrap()),
        start_time: start,
        end_time: start + chrono::Duration::hours(1),
        status: AppointmentStatus::Scheduled,
        notes: Some("bring supplies".to_string()),
        care_services: vec!["General Care".to_string()],
    }
}

#[tokio::test]
async fn test_records_persist_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("caresync.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.init_schema().await.unwrap();
        store.upsert_nurses(&[nurse("n1", "First")]).await.unwrap();
        store.upsert_patients(&[patient("p1")]).await.unwrap();
        store.upsert_appointments(&[appointment("a1")]).await.unwrap();
    }

    let reopened = SqliteStore::open(&path).unwrap();
    reopened.init_schema().await.unwrap();
    assert_eq!(reopened.count_nurses().await.unwrap(), 1);
    assert_eq!(reopened.count_patients().await.unwrap(), 1);
    assert_eq!(reopened.count_appointments().await.unwrap(), 1);
    assert!(reopened
        .existing_nurse_ids()
        .await
        .unwrap()
        .contains(&NurseId::new("n1").unwrap()));
}

#[tokio::test]
async fn test_repeated_upsert_replaces_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("caresync.db");
    let store = SqliteStore::open(&path).unwrap();
    store.init_schema().await.unwrap();

    store.upsert_nurses(&[nurse("n1", "First")]).await.unwrap();
    store.upsert_nurses(&[nurse("n1", "Second")]).await.unwrap();

    assert_eq!(store.count_nurses().await.unwrap(), 1);
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("caresync.db");
    let store = SqliteStore::open(&path).unwrap();

    store.init_schema().await.unwrap();
    store.upsert_nurses(&[nurse("n1", "Kept")]).await.unwrap();
    // Re-running schema creation must not drop existing data
    store.init_schema().await.unwrap();

    assert_eq!(store.count_nurses().await.unwrap(), 1);
}

#[tokio::test]
async fn test_mixed_batch_counts_each_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("caresync.db");
    let store = SqliteStore::open(&path).unwrap();
    store.init_schema().await.unwrap();

    let outcome = store
        .upsert_patients(&[patient("p1"), patient("p2"), patient("p1")])
        .await
        .unwrap();

    // Duplicate ids inside one batch replace each other
    assert_eq!(outcome.upserted, 3);
    assert_eq!(store.count_patients().await.unwrap(), 2);
}
