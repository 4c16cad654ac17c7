//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record plus draft/patch payloads.
//! - Provide lifecycle helpers used by planner services.
//!
//! # Invariants
//! - `id` is assigned once and never reused.
//! - `week_id` is derived from `scheduled_for` whenever a task is created.
//! - `status` only moves among `open`, `done` and `skipped`.

use crate::model::calendar::{week_id, CalendarError, WeekId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, globally unique task identifier.
pub type TaskId = String;

/// Category partition a task is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    Todos,
    Exercise,
    Dinner,
}

impl Board {
    /// Every board in display order.
    pub const ALL: [Board; 3] = [Board::Todos, Board::Exercise, Board::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todos => "todos",
            Self::Exercise => "exercise",
            Self::Dinner => "dinner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "todos" => Some(Self::Todos),
            "exercise" => Some(Self::Exercise),
            "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }
}

/// Board selector used by read queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardFilter {
    #[default]
    All,
    Only(Board),
}

impl BoardFilter {
    /// Parses `all` or a board name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "all" => Some(Self::All),
            other => Board::parse(other).map(Self::Only),
        }
    }

    pub fn matches(self, board: Board) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == board,
        }
    }
}

/// Task completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Done,
    Skipped,
}

impl TaskStatus {
    /// Flips `open` and `done`; `skipped` is returned unchanged.
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Done,
            Self::Done => Self::Open,
            Self::Skipped => Self::Skipped,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
            Self::Skipped => "skipped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "open" => Some(Self::Open),
            "done" => Some(Self::Done),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Med,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "low" => Some(Self::Low),
            "med" => Some(Self::Med),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Optional free-form key/value annotations attached to a task.
///
/// Serialized as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskMetadata(BTreeMap<String, String>);

impl TaskMetadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TaskMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Validation errors for caller-supplied task payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// Caller payload for creating a task, before id/timestamps are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub board: Board,
    pub scheduled_for: NaiveDate,
    pub priority: Priority,
    pub notes: Option<String>,
    pub remind_at: Option<NaiveDateTime>,
    pub metadata: Option<TaskMetadata>,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        board: Board,
        scheduled_for: NaiveDate,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            board,
            scheduled_for,
            priority,
            notes: None,
            remind_at: None,
            metadata: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_reminder(mut self, remind_at: NaiveDateTime) -> Self {
        self.remind_at = Some(remind_at);
        self
    }

    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Checks the title requirement.
    ///
    /// Planner `add` trusts its input; presentation callers run this first.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Partial update merged into an existing task.
///
/// Outer `None` leaves a field unchanged. For optional attributes,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub board: Option<Board>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub scheduled_for: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
    pub remind_at: Option<Option<NaiveDateTime>>,
    pub metadata: Option<Option<TaskMetadata>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub board: Board,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub scheduled_for: NaiveDate,
    pub week_id: WeekId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remind_at: Option<NaiveDateTime>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TaskMetadata>,
}

impl Task {
    /// Materializes a draft into an `open` task with a fresh id.
    ///
    /// Fails only when `scheduled_for` has no representable week.
    pub fn from_draft(draft: TaskDraft, now: DateTime<Utc>) -> Result<Self, CalendarError> {
        Ok(Self {
            id: new_task_id(),
            board: draft.board,
            title: draft.title,
            notes: draft.notes,
            status: TaskStatus::Open,
            week_id: week_id(draft.scheduled_for)?,
            scheduled_for: draft.scheduled_for,
            remind_at: draft.remind_at,
            priority: draft.priority,
            created_at: now,
            updated_at: now,
            metadata: draft.metadata,
        })
    }

    /// Builds a copy of this task scheduled on `date`, with a new id.
    ///
    /// The reminder is carried verbatim, not shifted to the new date.
    pub fn carried_to(&self, date: NaiveDate, now: DateTime<Utc>) -> Result<Self, CalendarError> {
        Ok(Self {
            id: new_task_id(),
            board: self.board,
            title: self.title.clone(),
            notes: self.notes.clone(),
            status: self.status,
            week_id: week_id(date)?,
            scheduled_for: date,
            remind_at: self.remind_at,
            priority: self.priority,
            created_at: now,
            updated_at: now,
            metadata: self.metadata.clone(),
        })
    }

    /// Merges `patch` and bumps `updated_at`.
    ///
    /// `week_id` is left as-is even when `scheduled_for` changes.
    pub fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(board) = patch.board {
            self.board = board;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(scheduled_for) = patch.scheduled_for {
            self.scheduled_for = scheduled_for;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(remind_at) = patch.remind_at {
            self.remind_at = remind_at;
        }
        if let Some(metadata) = patch.metadata {
            self.metadata = metadata;
        }
        self.updated_at = now;
    }

    /// Returns whether `week_id` still matches the week of `scheduled_for`.
    pub fn week_is_consistent(&self) -> bool {
        week_id(self.scheduled_for).is_ok_and(|derived| derived == self.week_id)
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}
