//! Behaviour of the persistence service over every backend.

use chrono::{DateTime, TimeZone, Utc};

use meeting_minutes::meeting::{ActionItem, ActionStatus, Decision, Discussion, Participant};
use meeting_minutes::persistence::DEFAULT_STORAGE_KEY;
use meeting_minutes::storage::{FileStore, MemoryStore, SqliteStore};
use meeting_minutes::{KeyValueStore, MeetingRecord, MeetingStore, ReadPolicy};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn record(id: &str, title: &str) -> MeetingRecord {
    let mut record = MeetingRecord::new(title, at(2024, 5, 1), "09:00", at(2024, 5, 1));
    record.id = id.to_string();
    record
}

fn full_record() -> MeetingRecord {
    let mut r = record("m-full", "Kickoff");
    r.end_time = Some("10:30".to_string());
    r.location = Some("Sala 2".to_string());
    r.participants
        .push(Participant::new("Ana").with_email("ana@example.com").with_role("PO"));
    r.participants.push(Participant::new("Bruno"));
    r.agenda = vec!["Escopo".to_string(), "Prazos".to_string()];
    let mut discussion = Discussion::new("Escopo", "Definição do MVP");
    discussion.notes = Some("Revisar na próxima semana".to_string());
    r.discussions.push(discussion);
    let mut decision = Decision::new("Stack", "Usar Rust");
    decision.rationale = Some("Desempenho".to_string());
    r.decisions.push(decision);
    let mut item = ActionItem::new("Criar repositório", "Bruno", at(2024, 6, 1));
    item.status = ActionStatus::Completed;
    r.action_items.push(item);
    r.general_notes = Some("Sem pendências".to_string());
    r.updated_at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 15, 30).unwrap();
    r
}

async fn check_contract<S: KeyValueStore>(store: MeetingStore<S>) {
    assert!(store.get_all().await.unwrap().is_empty());

    let a = record("a", "A");
    let b = record("b", "B");
    store.save_one(&a).await.unwrap();
    store.save_one(&b).await.unwrap();

    let mut a2 = a.clone();
    a2.title = "A2".to_string();
    store.save_one(&a2).await.unwrap();

    let all = store.get_all().await.unwrap();
    let ids: Vec<_> = all.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(all[0].title, "A2");

    store.delete_one("a").await.unwrap();
    let once = store.get_all().await.unwrap();
    store.delete_one("a").await.unwrap();
    let twice = store.get_all().await.unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);

    store.clear_all().await.unwrap();
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn contract_holds_for_memory_backend() {
    check_contract(MeetingStore::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn contract_holds_for_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    check_contract(MeetingStore::new(FileStore::new(dir.path()))).await;
}

#[tokio::test]
async fn contract_holds_for_sqlite_backend() {
    check_contract(MeetingStore::new(SqliteStore::open_in_memory().unwrap())).await;
}

#[tokio::test]
async fn sprint_planning_scenario() {
    let store = MeetingStore::new(MemoryStore::new());
    let mut r = record("m1", "Sprint Planning");
    r.agenda = vec!["Review backlog".to_string()];
    store.save_one(&r).await.unwrap();

    let all = store.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Sprint Planning");
    assert_eq!(all[0].agenda, vec!["Review backlog"]);
}

#[tokio::test]
async fn remove_first_of_two_keeps_second() {
    let store = MeetingStore::new(MemoryStore::new());
    store.save_one(&record("first", "One")).await.unwrap();
    store.save_one(&record("second", "Two")).await.unwrap();

    store.delete_one("first").await.unwrap();

    let all = store.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "second");
}

#[tokio::test]
async fn corrupt_document_reads_as_empty() {
    let backend = MemoryStore::new();
    backend
        .set(DEFAULT_STORAGE_KEY, "[{\"id\": \"broken\"")
        .await
        .unwrap();
    let store = MeetingStore::new(backend);
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_file_reads_as_empty_unless_strict() {
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::new(dir.path());
    files.set(DEFAULT_STORAGE_KEY, "not json at all").await.unwrap();

    let lenient = MeetingStore::new(files.clone());
    assert!(lenient.get_all().await.unwrap().is_empty());

    let strict = MeetingStore::new(files).with_read_policy(ReadPolicy::Strict);
    assert!(strict.get_all().await.is_err());
}

#[tokio::test]
async fn due_date_string_reads_as_calendar_instant() {
    let raw = r#"[{
        "id": "m1",
        "title": "Sprint Planning",
        "date": "2024-05-01T00:00:00.000Z",
        "startTime": "09:00",
        "participants": [],
        "agenda": [],
        "discussions": [],
        "decisions": [],
        "actionItems": [{
            "id": "a1",
            "description": "Atualizar board",
            "responsible": "Ana",
            "dueDate": "2024-06-01T00:00:00.000Z",
            "status": "pending"
        }],
        "createdAt": "2024-05-01T09:00:00.000Z",
        "updatedAt": "2024-05-01T09:00:00.000Z"
    }]"#;
    let backend = MemoryStore::new();
    backend.set(DEFAULT_STORAGE_KEY, raw).await.unwrap();
    let store = MeetingStore::new(backend).with_read_policy(ReadPolicy::Strict);

    let all = store.get_all().await.unwrap();
    assert_eq!(all[0].action_items[0].due_date, at(2024, 6, 1));
    assert_eq!(all[0].action_items[0].status, ActionStatus::Pending);
}

#[tokio::test]
async fn full_record_round_trips_through_storage() {
    let dir = tempfile::tempdir().unwrap();
    let store = MeetingStore::new(SqliteStore::open(dir.path().join("minutes.db")).unwrap());
    let original = full_record();
    store.save_one(&original).await.unwrap();

    let loaded = store.get_one("m-full").await.unwrap().unwrap();
    assert_eq!(loaded, original);
}

#[tokio::test]
async fn stored_document_uses_iso_strings() {
    let store = MeetingStore::new(MemoryStore::new());
    store.save_one(&full_record()).await.unwrap();

    let raw = store
        .backend()
        .get(DEFAULT_STORAGE_KEY)
        .await
        .unwrap()
        .unwrap();
    assert!(raw.starts_with('['));
    assert!(raw.contains(r#""dueDate":"2024-06-01T00:00:00.000Z""#));
    assert!(raw.contains(r#""updatedAt":"2024-05-02T08:15:30.000Z""#));
    assert!(raw.contains(r#""status":"completed""#));
}

/// Replays a deterministic mix of saves and removes against a simple model.
#[tokio::test]
async fn operation_sequence_matches_model() {
    let store = MeetingStore::new(MemoryStore::new());
    let mut model: Vec<MeetingRecord> = Vec::new();
    let mut seed: u32 = 7;

    for step in 0..60 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let id = format!("m{}", (seed >> 16) % 6);

        if (seed >> 8) % 3 == 0 {
            store.delete_one(&id).await.unwrap();
            model.retain(|m| m.id != id);
        } else {
            let r = record(&id, &format!("step {step}"));
            store.save_one(&r).await.unwrap();
            match model.iter_mut().find(|m| m.id == id) {
                Some(existing) => *existing = r,
                None => model.push(r),
            }
        }

        assert_eq!(store.get_all().await.unwrap(), model, "diverged at step {step}");
    }
}
