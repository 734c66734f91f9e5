//! The collection hook driven end to end: drafts in, records stored, PDFs out.

use chrono::{TimeZone, Utc};

use meeting_minutes::draft::{ActionItemDraft, ParticipantDraft};
use meeting_minutes::export::render_view;
use meeting_minutes::persistence::DEFAULT_STORAGE_KEY;
use meeting_minutes::storage::{FileStore, MemoryStore};
use meeting_minutes::{
    CollectionStatus, Error, Exporter, KeyValueStore, MeetingCollection, MeetingDraft,
    MeetingStore,
};

fn draft(title: &str) -> MeetingDraft {
    MeetingDraft {
        title: title.to_string(),
        date: "2024-05-01".to_string(),
        start_time: "09:00".to_string(),
        end_time: "10:15".to_string(),
        participants: vec![ParticipantDraft {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            ..ParticipantDraft::default()
        }],
        agenda: vec!["Review backlog".to_string()],
        action_items: vec![ActionItemDraft {
            description: "Atualizar board".to_string(),
            responsible: "Ana".to_string(),
            due_date: "2024-06-01T00:00:00.000Z".to_string(),
            ..ActionItemDraft::default()
        }],
        ..MeetingDraft::default()
    }
}

#[tokio::test]
async fn records_survive_a_new_collection() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let record = draft("Sprint Planning").create(now).unwrap();

    {
        let mut collection = MeetingCollection::load(MeetingStore::new(FileStore::new(dir.path()))).await;
        collection.save(&record).await.unwrap();
    }

    let reopened = MeetingCollection::load(MeetingStore::new(FileStore::new(dir.path()))).await;
    assert_eq!(reopened.status(), CollectionStatus::Idle);
    assert_eq!(reopened.find(&record.id), Some(&record));
}

#[tokio::test]
async fn edit_flow_keeps_identity_and_position() {
    let mut collection = MeetingCollection::load(MeetingStore::new(MemoryStore::new())).await;
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let first = draft("Daily").create(created).unwrap();
    let second = draft("Retro").create(created).unwrap();
    collection.save(&first).await.unwrap();
    collection.save(&second).await.unwrap();

    let mut edit = MeetingDraft::from_record(&first);
    edit.title = "Daily (revisada)".to_string();
    let edited_at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
    let updated = edit.apply(&first, edited_at).unwrap();
    collection.save(&updated).await.unwrap();

    let meetings = collection.meetings();
    assert_eq!(meetings.len(), 2);
    assert_eq!(meetings[0].id, first.id);
    assert_eq!(meetings[0].title, "Daily (revisada)");
    assert_eq!(meetings[0].created_at, created);
    assert_eq!(meetings[0].updated_at, edited_at);
    assert_eq!(meetings[0].participants[0].id, first.participants[0].id);
}

#[tokio::test]
async fn invalid_draft_never_reaches_storage() {
    let mut collection = MeetingCollection::load(MeetingStore::new(MemoryStore::new())).await;
    let mut bad = draft("");
    bad.participants[0].email = "not-an-email".to_string();

    let created = bad.create(Utc::now());
    if let Ok(record) = &created {
        collection.save(record).await.unwrap();
    }
    let err = created.unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert!(errors.for_field("title").is_some());
    assert!(errors.for_field("participants[0].email").is_some());
    assert!(collection.meetings().is_empty());
    assert_eq!(
        collection
            .store()
            .backend()
            .get(DEFAULT_STORAGE_KEY)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn created_now_reloads_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut collection = MeetingCollection::load(MeetingStore::new(FileStore::new(dir.path()))).await;
    let record = draft("Daily").create(Utc::now()).unwrap();
    collection.save(&record).await.unwrap();

    let mut edit = MeetingDraft::from_record(&record);
    edit.title = "Daily (revisada)".to_string();
    let edited = edit.apply(&record, Utc::now()).unwrap();
    collection.save(&edited).await.unwrap();

    let reopened = MeetingStore::new(FileStore::new(dir.path()));
    assert_eq!(reopened.get_one(&edited.id).await.unwrap(), Some(edited.clone()));
    assert_eq!(collection.find(&edited.id), Some(&edited));
}

#[tokio::test]
async fn same_draft_file_twice_gets_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daily.json");
    std::fs::write(
        &path,
        r#"{
            "title": "Daily",
            "date": "2024-05-01",
            "startTime": "09:00",
            "participants": [{"id": "p1", "name": "Ana"}]
        }"#,
    )
    .unwrap();

    let mut collection = MeetingCollection::load(MeetingStore::new(MemoryStore::new())).await;
    for _ in 0..2 {
        let record = MeetingDraft::load(&path).unwrap().create(Utc::now()).unwrap();
        collection.save(&record).await.unwrap();
    }

    let meetings = collection.store().get_all().await.unwrap();
    assert_eq!(meetings.len(), 2);
    let mut ids: Vec<&str> = meetings.iter().flat_map(|m| m.ids()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert!(!ids.contains(&"p1"));
}

#[tokio::test]
async fn write_failure_is_reported_and_snapshot_kept() {
    let store = MeetingStore::new(MemoryStore::with_quota(2048));
    let mut collection = MeetingCollection::load(store).await;
    let now = Utc::now();
    let kept = draft("Daily").create(now).unwrap();
    collection.save(&kept).await.unwrap();

    let mut huge = draft("Planejamento anual");
    huge.general_notes = "x".repeat(10_000);
    let huge = huge.create(now).unwrap();

    let err = collection.save(&huge).await.unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded { .. }));
    assert_eq!(collection.meetings().len(), 1);
    assert!(matches!(collection.status(), CollectionStatus::Error(_)));
    assert_eq!(collection.store().get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn export_reads_without_touching_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut collection = MeetingCollection::load(MeetingStore::new(MemoryStore::new())).await;
    let record = draft("Sprint Planning")
        .create(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        .unwrap();
    collection.save(&record).await.unwrap();
    let before = collection
        .store()
        .backend()
        .get(DEFAULT_STORAGE_KEY)
        .await
        .unwrap();

    let mut exporter = Exporter::default();
    let element_id = exporter.register(render_view(&record, Utc::now()));
    let path = exporter.export(&record, &element_id, dir.path()).unwrap();

    assert!(path.ends_with("ata-reuniao-sprint-planning-2024-05-01.pdf"));
    let after = collection
        .store()
        .backend()
        .get(DEFAULT_STORAGE_KEY)
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn clear_empties_view_and_store() {
    let mut collection = MeetingCollection::load(MeetingStore::new(MemoryStore::new())).await;
    collection
        .save(&draft("Daily").create(Utc::now()).unwrap())
        .await
        .unwrap();

    collection.clear().await.unwrap();
    assert!(collection.meetings().is_empty());
    assert!(collection.store().get_all().await.unwrap().is_empty());
    assert!(!collection.is_loading());
}
