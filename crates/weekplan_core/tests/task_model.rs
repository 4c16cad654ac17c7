use chrono::{NaiveDate, Utc};
use weekplan_core::{
    Board, Priority, Task, TaskDraft, TaskMetadata, TaskPatch, TaskStatus, TaskValidationError,
};

fn draft() -> TaskDraft {
    TaskDraft::new(
        "Tacos",
        Board::Dinner,
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        Priority::Med,
    )
}

#[test]
fn from_draft_assigns_id_week_and_open_status() {
    let now = Utc::now();
    let task = Task::from_draft(draft(), now).unwrap();

    assert!(!task.id.is_empty());
    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.week_id, "week-2024-01-01");
    assert_eq!(task.created_at, now);
    assert_eq!(task.updated_at, now);
    assert!(task.week_is_consistent());
}

#[test]
fn ids_are_unique_per_task() {
    let now = Utc::now();
    let a = Task::from_draft(draft(), now).unwrap();
    let b = Task::from_draft(draft(), now).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn serialization_uses_lowercase_enums_and_omits_absent_optionals() {
    let task = Task::from_draft(draft(), Utc::now()).unwrap();
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["board"], "dinner");
    assert_eq!(json["status"], "open");
    assert_eq!(json["priority"], "med");
    assert_eq!(json["scheduled_for"], "2024-01-05");
    assert_eq!(json["week_id"], "week-2024-01-01");
    assert!(json.get("notes").is_none());
    assert!(json.get("remind_at").is_none());
    assert!(json.get("metadata").is_none());

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn metadata_serializes_as_plain_object() {
    let metadata: TaskMetadata = [("source", "import"), ("servings", "4")]
        .into_iter()
        .collect();
    let task = Task::from_draft(draft().with_metadata(metadata), Utc::now()).unwrap();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["metadata"]["servings"], "4");
    assert_eq!(json["metadata"]["source"], "import");
    let metadata = task.metadata.unwrap();
    assert_eq!(metadata.get("servings"), Some("4"));
    let keys: Vec<&str> = metadata.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["servings", "source"]);
}

#[test]
fn apply_patch_can_clear_optional_fields() {
    let reminder = NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(17, 30, 0)
        .unwrap();
    let mut task = Task::from_draft(
        draft().with_notes("buy tortillas").with_reminder(reminder),
        Utc::now(),
    )
    .unwrap();

    task.apply_patch(
        TaskPatch {
            notes: Some(None),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        },
        Utc::now(),
    );

    assert_eq!(task.notes, None);
    assert_eq!(task.remind_at, Some(reminder));
    assert_eq!(task.priority, Priority::High);
}

#[test]
fn rescheduling_via_patch_keeps_original_week_id() {
    let mut task = Task::from_draft(draft(), Utc::now()).unwrap();
    task.apply_patch(
        TaskPatch {
            scheduled_for: NaiveDate::from_ymd_opt(2024, 1, 9),
            ..TaskPatch::default()
        },
        Utc::now(),
    );

    assert_eq!(task.week_id, "week-2024-01-01");
    assert!(!task.week_is_consistent());
}

#[test]
fn draft_validation_requires_title() {
    assert!(draft().validate().is_ok());
    let mut blank = draft();
    blank.title = "\t".to_string();
    assert_eq!(blank.validate(), Err(TaskValidationError::BlankTitle));
}
