//! Week rollover planning.
//!
//! # Invariants
//! - Only `open` tasks owned by the source week are carried.
//! - Carried tasks keep their Monday-start weekday position.
//! - Source tasks are read, never modified.

use crate::model::calendar::{week_dates, weekday_index, CalendarError, WeekId};
use crate::model::task::{Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};

/// Result of one "start next week" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverOutcome {
    /// Week that became current.
    pub week_id: WeekId,
    /// `false` when the target week already existed and nothing was carried.
    pub created_week: bool,
    /// Ids of the new tasks, in source collection order.
    pub carried_task_ids: Vec<TaskId>,
}

/// Builds fresh copies of the open tasks of `from_week`, placed in `to_week`.
pub fn carry_open_tasks(
    tasks: &[Task],
    from_week: &str,
    to_week: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Task>, CalendarError> {
    let target_dates = week_dates(to_week)?;
    tasks
        .iter()
        .filter(|task| task.week_id == from_week && task.status == TaskStatus::Open)
        .map(|task| task.carried_to(target_dates[weekday_index(task.scheduled_for)], now))
        .collect()
}
