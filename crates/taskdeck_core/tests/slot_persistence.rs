use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use taskdeck_core::{
    decode_tasks, encode_tasks, MemorySlotRepository, NewTask, SlotRepository,
    SqliteSlotRepository, StorageError, StorageResult, StoreError, StoreErrorKind, TaskId,
    TaskPatch, TaskStatus, TaskStore, DEFAULT_SLOT_KEY,
};

/// Memory slot whose reads and writes can be switched off mid-test.
#[derive(Clone, Default)]
struct FlakySlot {
    inner: MemorySlotRepository,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl SlotRepository for FlakySlot {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk offline".to_string()));
        }
        self.inner.read_slot(key)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.write_slot(key, value)
    }
}

#[test]
fn reopening_sqlite_file_restores_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");

    let (done_id, noted_id) = {
        let store = TaskStore::open(&path).unwrap();
        let done = store.create(NewTask::new("submit invoice")).unwrap();
        store
            .update(&done.id, TaskPatch::status(TaskStatus::Completed))
            .unwrap();
        let noted = store.create(NewTask::new("book venue")).unwrap();
        store.append_note(&noted.id, "two options left", "alice").unwrap();
        (done.id, noted.id)
    };

    let reopened = TaskStore::open(&path).unwrap();
    let tasks = reopened.list();
    assert_eq!(tasks.len(), 2);
    assert!(reopened.get(&done_id).unwrap().completed_at.is_some());
    assert_eq!(reopened.get(&noted_id).unwrap().notes.len(), 1);
}

#[test]
fn every_mutation_is_written_through_to_the_slot() {
    let repo = SqliteSlotRepository::open_in_memory().unwrap();
    let store = TaskStore::new(repo);

    let task = store.create(NewTask::new("persist me")).unwrap();
    store.append_note(&task.id, "first", "alice").unwrap();
    store.reload();

    let reloaded = store.get(&task.id).unwrap();
    assert_eq!(reloaded.notes.len(), 1);
    assert_eq!(reloaded, store.list()[0]);
}

#[test]
fn slot_blob_uses_camel_case_wire_fields() {
    let mut repo = SqliteSlotRepository::open_in_memory().unwrap();
    let store = TaskStore::new(MemorySlotRepository::new());
    let task = store
        .create(NewTask {
            site_name: "North yard".to_string(),
            is_urgent: true,
            ..NewTask::new("inspect")
        })
        .unwrap();

    repo.write_slot(
        DEFAULT_SLOT_KEY,
        &taskdeck_core::encode_tasks(&store.list()).unwrap(),
    )
    .unwrap();
    let blob = repo.read_slot(DEFAULT_SLOT_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();

    assert!(json.is_array());
    let record = &json[0];
    assert_eq!(record["id"], task.id.to_string());
    assert_eq!(record["siteName"], "North yard");
    assert_eq!(record["isUrgent"], true);
    assert_eq!(record["status"], "pending");
    assert_eq!(record["priority"], "medium");
    assert!(record["completedAt"].is_null());
    assert!(record["createdAt"].as_str().unwrap().contains('T'));
}

#[test]
fn corrupt_slot_loads_as_empty_and_heals_on_next_write() {
    let repo = MemorySlotRepository::new().with_slot(DEFAULT_SLOT_KEY, "{not json");
    let store = TaskStore::new(repo);

    assert!(store.list().is_empty());

    let task = store.create(NewTask::new("fresh start")).unwrap();
    store.reload();
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].id, task.id);
}

#[test]
fn unreadable_slot_reads_as_empty_and_rejects_mutations() {
    let repo = FlakySlot {
        fail_reads: Arc::new(AtomicBool::new(true)),
        ..FlakySlot::default()
    };
    let store = TaskStore::new(repo);

    assert!(store.list().is_empty());
    assert!(store.get(&TaskId::generate()).is_none());

    let err = store.create(NewTask::new("blind write")).unwrap_err();
    assert!(matches!(err, StoreError::Storage(StorageError::Unavailable(_))));
    assert_eq!(err.kind(), StoreErrorKind::Storage);
}

#[test]
fn transient_read_failure_keeps_stored_tasks() {
    let seed = TaskStore::new(MemorySlotRepository::new());
    for title in ["rent", "groceries", "dentist"] {
        seed.create(NewTask::new(title)).unwrap();
    }
    let blob = encode_tasks(&seed.list()).unwrap();

    let fail_reads = Arc::new(AtomicBool::new(false));
    let store = TaskStore::new(FlakySlot {
        inner: MemorySlotRepository::new().with_slot(DEFAULT_SLOT_KEY, blob),
        fail_reads: Arc::clone(&fail_reads),
        ..FlakySlot::default()
    });

    fail_reads.store(true, Ordering::SeqCst);
    assert!(store.list().is_empty());
    let err = store.create(NewTask::new("during outage")).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Storage);

    fail_reads.store(false, Ordering::SeqCst);
    assert_eq!(store.list().len(), 3);
    store.create(NewTask::new("after outage")).unwrap();

    store.reload();
    let titles: Vec<String> = store.list().into_iter().map(|task| task.title).collect();
    assert_eq!(titles, ["rent", "groceries", "dentist", "after outage"]);
}

#[test]
fn legacy_blob_with_todo_status_loads() {
    let blob = r#"[{
        "id": "1712345678901",
        "title": "Pay water bill",
        "status": "todo",
        "priority": "high",
        "dueDate": "2025-06-01",
        "isUrgent": true,
        "isImportant": true,
        "category": "bill-payments",
        "collaborator": "",
        "createdAt": "2025-05-20T10:00:00.000Z",
        "updatedAt": "2025-05-20T10:00:00.000Z",
        "completedAt": null,
        "notes": [{
            "id": "1712345699000",
            "content": "autopay set up",
            "createdAt": "2025-05-21T09:00:00.000Z",
            "createdBy": "Current User"
        }]
    }, {
        "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
        "title": "Renew passport",
        "status": "completed",
        "createdAt": "2025-05-01T10:00:00.000Z",
        "updatedAt": "2025-05-03T10:00:00.000Z",
        "completedAt": "2025-05-03T10:00:00.000Z"
    }]"#;
    let store = TaskStore::new(MemorySlotRepository::new().with_slot(DEFAULT_SLOT_KEY, blob));

    let tasks = store.list();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id.as_str(), "1712345678901");
    assert_eq!(tasks[0].status, TaskStatus::Pending);
    assert_eq!(tasks[0].category, "bill-payments");
    assert_eq!(tasks[0].due_date.unwrap().to_string(), "2025-06-01");
    assert_eq!(tasks[0].notes[0].id.as_str(), "1712345699000");
    assert_eq!(tasks[1].status, TaskStatus::Completed);

    let legacy_id = TaskId::from("1712345678901");
    let updated = store
        .append_note(&legacy_id, "paid", "Current User")
        .unwrap();
    assert_eq!(updated.notes.len(), 2);
    store.reload();
    assert_eq!(store.get(&legacy_id).unwrap().notes.len(), 2);
    assert_eq!(store.list().len(), 2);
}

#[test]
fn failed_write_rolls_back_in_memory_state() {
    let fail_writes = Arc::new(AtomicBool::new(false));
    let repo = FlakySlot {
        fail_writes: Arc::clone(&fail_writes),
        ..FlakySlot::default()
    };
    let store = TaskStore::new(repo);
    let task = store.create(NewTask::new("survives")).unwrap();

    fail_writes.store(true, Ordering::SeqCst);

    let err = store.create(NewTask::new("never saved")).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(err.kind(), StoreErrorKind::Storage);

    let err = store
        .update(&task.id, TaskPatch::status(TaskStatus::Completed))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Storage);
    assert!(store.delete(&task.id).is_err());

    let tasks = store.list();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Pending);
    assert_eq!(tasks[0].completed_at, None);

    fail_writes.store(false, Ordering::SeqCst);
    store
        .update(&task.id, TaskPatch::status(TaskStatus::Completed))
        .unwrap();
    assert!(store.get(&task.id).unwrap().completed_at.is_some());
}

#[test]
fn custom_slot_keys_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");

    {
        let work = TaskStore::with_slot_key(SqliteSlotRepository::open(&path).unwrap(), "work");
        work.create(NewTask::new("standup notes")).unwrap();
        assert_eq!(work.slot_key(), "work");
    }
    {
        let home = TaskStore::with_slot_key(SqliteSlotRepository::open(&path).unwrap(), "home");
        assert!(home.list().is_empty());
        home.create(NewTask::new("fix bike")).unwrap();
    }

    let repo = SqliteSlotRepository::open(&path).unwrap();
    let work = decode_tasks(&repo.read_slot("work").unwrap().unwrap()).unwrap();
    let home = decode_tasks(&repo.read_slot("home").unwrap().unwrap()).unwrap();
    assert_eq!(work[0].title, "standup notes");
    assert_eq!(home[0].title, "fix bike");
    assert_eq!(repo.read_slot(DEFAULT_SLOT_KEY).unwrap(), None);
}
