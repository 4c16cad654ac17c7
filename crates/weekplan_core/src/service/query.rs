//! Read-only projections over the task collection.
//!
//! # Invariants
//! - Queries never reorder tasks beyond the done/not-done partition.
//! - Queries never mutate their input.

use crate::model::calendar::{week_dates, CalendarError};
use crate::model::task::{Board, BoardFilter, Task, TaskStatus};
use chrono::NaiveDate;

/// Per-day badge counts for the calendar strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub total: usize,
    pub open: usize,
}

/// Per-board badge counts for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardCounts {
    pub todos: usize,
    pub exercise: usize,
    pub dinner: usize,
}

impl BoardCounts {
    pub fn get(&self, board: Board) -> usize {
        match board {
            Board::Todos => self.todos,
            Board::Exercise => self.exercise,
            Board::Dinner => self.dinner,
        }
    }

    pub fn total(&self) -> usize {
        self.todos + self.exercise + self.dinner
    }

    fn bump(&mut self, board: Board) {
        match board {
            Board::Todos => self.todos += 1,
            Board::Exercise => self.exercise += 1,
            Board::Dinner => self.dinner += 1,
        }
    }
}

/// Status totals for every task owned by one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekSummary {
    pub open: usize,
    pub done: usize,
    pub skipped: usize,
}

impl WeekSummary {
    pub fn total(&self) -> usize {
        self.open + self.done + self.skipped
    }
}

/// Tasks scheduled exactly on `date` under `filter`, with `done` tasks last.
///
/// The partition is stable: collection order is kept inside each group.
pub fn tasks_for(tasks: &[Task], date: NaiveDate, filter: BoardFilter) -> Vec<&Task> {
    let (pending, done): (Vec<&Task>, Vec<&Task>) = tasks
        .iter()
        .filter(|task| task.scheduled_for == date && filter.matches(task.board))
        .partition(|task| !task.is_done());

    pending.into_iter().chain(done).collect()
}

/// Badge counts for each of the seven days of `week_id`.
pub fn day_counts(
    tasks: &[Task],
    week_id: &str,
    filter: BoardFilter,
) -> Result<Vec<DayCount>, CalendarError> {
    let dates = week_dates(week_id)?;
    Ok(dates
        .iter()
        .map(|&date| {
            let on_day = tasks
                .iter()
                .filter(|task| task.scheduled_for == date && filter.matches(task.board));
            let (total, open) = on_day.fold((0, 0), |(total, open), task| {
                let open_inc = usize::from(task.status == TaskStatus::Open);
                (total + 1, open + open_inc)
            });
            DayCount { date, total, open }
        })
        .collect())
}

/// Badge counts per board for tasks scheduled on `date`.
pub fn board_counts(tasks: &[Task], date: NaiveDate) -> BoardCounts {
    let mut counts = BoardCounts::default();
    for task in tasks.iter().filter(|task| task.scheduled_for == date) {
        counts.bump(task.board);
    }
    counts
}

/// Status totals for tasks whose `week_id` equals `week_id`.
pub fn week_summary(tasks: &[Task], week_id: &str) -> WeekSummary {
    let mut summary = WeekSummary::default();
    for task in tasks.iter().filter(|task| task.week_id == week_id) {
        match task.status {
            TaskStatus::Open => summary.open += 1,
            TaskStatus::Done => summary.done += 1,
            TaskStatus::Skipped => summary.skipped += 1,
        }
    }
    summary
}
