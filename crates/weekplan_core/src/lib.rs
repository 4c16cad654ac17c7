//! Core scheduling logic for the weekly planner.
//! Week identity, task lifecycle, rollover and display queries live here.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::calendar::{
    parse_week_id, shift_week, week_dates, week_id, week_start, weekday_index, CalendarError,
    WeekDirection, WeekId, DAYS_PER_WEEK, WEEK_ID_PREFIX,
};
pub use model::task::{
    Board, BoardFilter, Priority, Task, TaskDraft, TaskId, TaskMetadata, TaskPatch, TaskStatus,
    TaskValidationError,
};
pub use model::week::Week;
pub use repo::collection_repo::{CollectionRepository, TASKS_KEY, WEEKS_KEY};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use service::planner::{PlannerError, PlannerResult, PlannerSession};
pub use service::query::{BoardCounts, DayCount, WeekSummary};
pub use service::rollover::RolloverOutcome;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
