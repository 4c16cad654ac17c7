//! Planner session: the in-memory authority over tasks and weeks.
//!
//! # Responsibility
//! - Load both collections once and keep them for the session.
//! - Apply task CRUD, week navigation and rollover, persisting whole
//!   collections after each mutation.
//! - Track the current week and the active (selected) date.
//!
//! # Invariants
//! - Mutations on unknown task ids are silent no-ops and write nothing.
//! - Week records are created lazily and never mutated or removed.
//! - Loading and reading never create week records; only `open`,
//!   `ensure_week`, `navigate`, `select_date` and `start_next_week` do.
//! - Rollover into a given week happens at most once.
//! - A failed write is returned to the caller; the in-memory mutation stays.

use crate::model::calendar::{
    parse_week_id, shift_week, week_id, CalendarError, WeekDirection, WeekId,
};
use crate::model::task::{BoardFilter, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::model::week::Week;
use crate::repo::collection_repo::CollectionRepository;
use crate::repo::kv_store::{KeyValueStore, StoreError};
use crate::service::query::{self, BoardCounts, DayCount, WeekSummary};
use crate::service::rollover::{carry_open_tasks, RolloverOutcome};
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Errors surfaced by planner operations.
#[derive(Debug)]
pub enum PlannerError {
    /// Reading or writing a collection failed.
    Store(StoreError),
    /// A week identifier could not be decoded.
    Calendar(CalendarError),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "planner store failure: {err}"),
            Self::Calendar(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Calendar(err) => Some(err),
        }
    }
}

impl From<StoreError> for PlannerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CalendarError> for PlannerError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

/// Session-scoped owner of the task and week collections.
pub struct PlannerSession<S: KeyValueStore> {
    repo: CollectionRepository<S>,
    tasks: Vec<Task>,
    weeks: Vec<Week>,
    current_week_id: WeekId,
    active_date: NaiveDate,
}

impl<S: KeyValueStore> PlannerSession<S> {
    /// Loads both collections and opens on the week containing `today`.
    ///
    /// The current week record is created if it does not exist yet.
    ///
    /// # Errors
    /// Same as [`Self::load`], plus `PlannerError::Store` when the initial
    /// week record cannot be written.
    pub fn open(store: S, today: NaiveDate) -> PlannerResult<Self> {
        let mut session = Self::load(store, today)?;
        let current = session.current_week_id.clone();
        session.ensure_week(&current)?;
        Ok(session)
    }

    /// Loads both collections with `anchor` as the active date.
    ///
    /// No week record is created, so reads through a loaded session leave
    /// the stored weeks untouched.
    ///
    /// # Errors
    /// Returns `PlannerError::Store` when the store cannot be read and
    /// `PlannerError::Calendar` when `anchor` has no representable week.
    /// Undecodable collection text is not an error; it loads as empty.
    pub fn load(store: S, anchor: NaiveDate) -> PlannerResult<Self> {
        let started_at = Instant::now();
        let current_week_id = week_id(anchor)?;
        let repo = CollectionRepository::new(store);
        let tasks = repo.load_tasks()?;
        let weeks = repo.load_weeks()?;

        info!(
            "event=planner_load module=planner status=ok week_id={} tasks={} weeks={} duration_ms={}",
            current_week_id,
            tasks.len(),
            weeks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            repo,
            tasks,
            weeks,
            current_week_id,
            active_date: anchor,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn current_week_id(&self) -> &str {
        &self.current_week_id
    }

    pub fn active_date(&self) -> NaiveDate {
        self.active_date
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn week(&self, id: &str) -> Option<&Week> {
        self.weeks.iter().find(|week| week.id == id)
    }

    /// Creates a task from `draft` and appends it to the collection.
    ///
    /// # Contract
    /// - The draft is not validated here; callers run `TaskDraft::validate`.
    /// - `week_id` is derived from `scheduled_for`.
    pub fn add(&mut self, draft: TaskDraft) -> PlannerResult<TaskId> {
        let task = Task::from_draft(draft, Utc::now())?;
        let id = task.id.clone();
        info!(
            "event=task_add module=planner status=ok task_id={} board={} week_id={}",
            task.id,
            task.board.as_str(),
            task.week_id
        );
        self.tasks.push(task);
        self.persist_tasks()?;
        Ok(id)
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// Returns `Ok(false)` without writing when `id` is unknown. The task's
    /// `week_id` is not re-derived when `scheduled_for` moves.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> PlannerResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_update module=planner status=skipped task_id={id} reason=not_found");
            return Ok(false);
        };

        task.apply_patch(patch, Utc::now());
        if task.week_is_consistent() {
            debug!("event=task_update module=planner status=ok task_id={id}");
        } else {
            warn!(
                "event=task_update module=planner status=ok task_id={id} week_id={} scheduled_for={} note=week_mismatch",
                task.week_id, task.scheduled_for
            );
        }

        self.persist_tasks()?;
        Ok(true)
    }

    /// Removes the task with `id`; `Ok(false)` when it does not exist.
    pub fn delete(&mut self, id: &str) -> PlannerResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=planner status=skipped task_id={id} reason=not_found");
            return Ok(false);
        }

        info!("event=task_delete module=planner status=ok task_id={id}");
        self.persist_tasks()?;
        Ok(true)
    }

    /// Flips `open` and `done`. Skipped and unknown tasks are left alone.
    pub fn toggle(&mut self, id: &str) -> PlannerResult<bool> {
        match self.task(id).map(|task| task.status) {
            Some(status @ (TaskStatus::Open | TaskStatus::Done)) => {
                self.update(id, TaskPatch::status(status.toggled()))
            }
            Some(TaskStatus::Skipped) | None => Ok(false),
        }
    }

    /// Creates and persists the week record for `week_id` if absent.
    ///
    /// Returns whether a record was created.
    pub fn ensure_week(&mut self, week_id: &str) -> PlannerResult<bool> {
        if self.week(week_id).is_some() {
            return Ok(false);
        }

        let week = Week::for_id(week_id, Utc::now())?;
        info!(
            "event=week_ensure module=planner status=created week_id={} start={} end={}",
            week.id, week.start_date, week.end_date
        );
        self.weeks.push(week);
        self.persist_weeks()?;
        Ok(true)
    }

    /// Moves to the adjacent week and selects its Monday.
    pub fn navigate(&mut self, direction: WeekDirection) -> PlannerResult<&str> {
        let target = shift_week(&self.current_week_id, direction)?;
        let monday = parse_week_id(&target)?;
        self.ensure_week(&target)?;
        self.current_week_id = target;
        self.active_date = monday;
        Ok(&self.current_week_id)
    }

    /// Selects `date`, switching the current week when it lies elsewhere.
    pub fn select_date(&mut self, date: NaiveDate) -> PlannerResult<()> {
        let target = week_id(date)?;
        if target != self.current_week_id {
            self.ensure_week(&target)?;
            self.current_week_id = target;
        }
        self.active_date = date;
        Ok(())
    }

    /// Starts the week after the current one, carrying open tasks forward.
    ///
    /// When the next week already exists no tasks are carried; the current
    /// week and active date still advance to its Monday.
    pub fn start_next_week(&mut self) -> PlannerResult<RolloverOutcome> {
        let from_week = self.current_week_id.clone();
        let next_week = shift_week(&from_week, WeekDirection::Next)?;
        let next_monday = parse_week_id(&next_week)?;

        let created_week = self.week(&next_week).is_none();
        let mut carried_task_ids = Vec::new();
        if created_week {
            let now = Utc::now();
            let week = Week::for_id(&next_week, now)?;
            let carried = carry_open_tasks(&self.tasks, &from_week, &next_week, now)?;
            carried_task_ids = carried.iter().map(|task| task.id.clone()).collect();
            self.weeks.push(week);
            self.tasks.extend(carried);
        }

        self.current_week_id = next_week.clone();
        self.active_date = next_monday;

        if created_week {
            // Tasks before weeks: a persisted week always has its carried tasks.
            self.persist_tasks()?;
            self.persist_weeks()?;
        }

        info!(
            "event=rollover module=planner status=ok from_week={} to_week={} created_week={} carried={}",
            from_week,
            next_week,
            created_week,
            carried_task_ids.len()
        );
        Ok(RolloverOutcome {
            week_id: next_week,
            created_week,
            carried_task_ids,
        })
    }

    /// Tasks on `date` under `filter`, non-done first.
    pub fn tasks_for(&self, date: NaiveDate, filter: BoardFilter) -> Vec<&Task> {
        query::tasks_for(&self.tasks, date, filter)
    }

    /// Calendar-strip counts for the current week.
    pub fn day_counts(&self, filter: BoardFilter) -> PlannerResult<Vec<DayCount>> {
        Ok(query::day_counts(&self.tasks, &self.current_week_id, filter)?)
    }

    /// Tab counts for the active date.
    pub fn board_counts(&self) -> BoardCounts {
        query::board_counts(&self.tasks, self.active_date)
    }

    pub fn week_summary(&self, week_id: &str) -> WeekSummary {
        query::week_summary(&self.tasks, week_id)
    }

    fn persist_tasks(&self) -> PlannerResult<()> {
        self.repo.save_tasks(&self.tasks).map_err(|err| {
            error!(
                "event=store_save module=planner status=error collection=tasks items={} error={}",
                self.tasks.len(),
                err
            );
            PlannerError::from(err)
        })
    }

    fn persist_weeks(&self) -> PlannerResult<()> {
        self.repo.save_weeks(&self.weeks).map_err(|err| {
            error!(
                "event=store_save module=planner status=error collection=weeks items={} error={}",
                self.weeks.len(),
                err
            );
            PlannerError::from(err)
        })
    }
}
