//! FFI use-case API for the planner UI.
//!
//! # Responsibility
//! - Expose planner callbacks (`add`, `update`, `delete`, `toggle`,
//!   `navigate`, `start_next_week`) and read queries to Dart via FRB.
//! - Run caller-side draft validation before tasks reach the core.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One planner session is open at a time per process.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.
//! - Reads and task edits never create week records.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use weekplan_core::db::open_db;
use weekplan_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_week_id,
    ping as ping_inner, week_dates, Board, BoardFilter, PlannerSession, Priority,
    SqliteKeyValueStore, Task, TaskDraft, TaskPatch, TaskStatus, Week, WeekDirection,
};

const DB_FILE_NAME: &str = "weekplan.sqlite3";
const DB_PATH_ENV: &str = "WEEKPLAN_DB_PATH";
const DATE_FORMAT: &str = "%Y-%m-%d";
const REMINDER_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One metadata key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// Flat task projection handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    /// `todos|exercise|dinner`.
    pub board: String,
    pub title: String,
    pub notes: Option<String>,
    /// `open|done|skipped`.
    pub status: String,
    /// `low|med|high`.
    pub priority: String,
    pub scheduled_for: String,
    pub week_id: String,
    pub remind_at: Option<String>,
    /// Sorted by key; empty when the task has no metadata.
    pub metadata: Vec<MetadataEntry>,
}

/// Flat week projection handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekItem {
    pub id: String,
    pub start_date: String,
    pub end_date: String,
}

/// Result envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Affected task id, when one exists.
    pub task_id: Option<String>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Task list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    pub message: String,
}

impl TaskListResponse {
    fn from_items(items: Vec<TaskItem>) -> Self {
        let message = if items.is_empty() {
            "No tasks.".to_string()
        } else {
            format!("Found {} task(s).", items.len())
        };
        Self { items, message }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Stored week records, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekListResponse {
    pub items: Vec<WeekItem>,
    pub message: String,
}

/// Calendar-strip badge for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCountItem {
    pub date: String,
    pub total: u32,
    pub open: u32,
}

/// Badge counts for the seven days of a week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCountsResponse {
    pub ok: bool,
    pub items: Vec<DayCountItem>,
    pub message: String,
}

/// Tab badge counts for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCountsResponse {
    pub ok: bool,
    pub todos: u32,
    pub exercise: u32,
    pub dinner: u32,
    pub message: String,
}

/// Status totals of one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummaryResponse {
    pub ok: bool,
    pub open: u32,
    pub done: u32,
    pub skipped: u32,
    pub message: String,
}

/// Week view envelope after navigation or rollover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekViewResponse {
    pub ok: bool,
    pub week_id: Option<String>,
    /// Monday..Sunday as `YYYY-MM-DD`.
    pub dates: Vec<String>,
    pub active_date: Option<String>,
    /// Tasks carried forward by rollover; zero for plain navigation.
    pub carried_count: u32,
    pub message: String,
}

impl WeekViewResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            week_id: None,
            dates: Vec::new(),
            active_date: None,
            carried_count: 0,
            message: message.into(),
        }
    }
}

/// Adds a task after validating the draft.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_add_task(
    title: String,
    board: String,
    scheduled_for: String,
    priority: String,
    notes: Option<String>,
    remind_at: Option<String>,
) -> TaskActionResponse {
    let draft = match build_draft(title, &board, &scheduled_for, &priority, notes, remind_at) {
        Ok(draft) => draft,
        Err(message) => return TaskActionResponse::failure(message),
    };

    match with_session(today(), |session| session.add(draft).map_err(|err| err.to_string())) {
        Ok(task_id) => TaskActionResponse::success("Task added.", Some(task_id)),
        Err(err) => TaskActionResponse::failure(format!("planner_add_task failed: {err}")),
    }
}

/// Applies a partial edit. Unknown ids succeed without changes.
///
/// `notes = Some("")` clears the notes and `remind_at = Some("")` clears
/// the reminder. Moving `scheduled_for` keeps the task's week id.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn planner_update_task(
    task_id: String,
    title: Option<String>,
    board: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    scheduled_for: Option<String>,
    notes: Option<String>,
    remind_at: Option<String>,
) -> TaskActionResponse {
    let fields = PatchFields {
        title,
        board,
        status,
        priority,
        scheduled_for,
        notes,
        remind_at,
    };
    let patch = match build_patch(fields) {
        Ok(patch) => patch,
        Err(message) => return TaskActionResponse::failure(message),
    };
    if patch.is_empty() {
        return TaskActionResponse::success("Nothing to update.", None);
    }

    match with_session(today(), |session| {
        session.update(&task_id, patch).map_err(|err| err.to_string())
    }) {
        Ok(true) => TaskActionResponse::success("Task updated.", Some(task_id)),
        Ok(false) => TaskActionResponse::success("No matching task.", None),
        Err(err) => TaskActionResponse::failure(format!("planner_update_task failed: {err}")),
    }
}

/// Deletes a task. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_task(task_id: String) -> TaskActionResponse {
    match with_session(today(), |session| {
        session.delete(&task_id).map_err(|err| err.to_string())
    }) {
        Ok(true) => TaskActionResponse::success("Task deleted.", Some(task_id)),
        Ok(false) => TaskActionResponse::success("No matching task.", None),
        Err(err) => TaskActionResponse::failure(format!("planner_delete_task failed: {err}")),
    }
}

/// Flips a task between open and done.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_task(task_id: String) -> TaskActionResponse {
    match with_session(today(), |session| {
        session.toggle(&task_id).map_err(|err| err.to_string())
    }) {
        Ok(true) => TaskActionResponse::success("Task toggled.", Some(task_id)),
        Ok(false) => TaskActionResponse::success("Nothing to toggle.", None),
        Err(err) => TaskActionResponse::failure(format!("planner_toggle_task failed: {err}")),
    }
}

/// Opens the week containing `date`, creating its record on first visit.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_open_week(date: String) -> WeekViewResponse {
    let anchor = match parse_date(&date) {
        Ok(anchor) => anchor,
        Err(message) => return WeekViewResponse::failure(message),
    };

    let result = with_session(anchor, |session| {
        let week_id = session.current_week_id().to_string();
        session.ensure_week(&week_id).map_err(|err| err.to_string())?;
        Ok((week_id, session.active_date()))
    });
    match result {
        Ok((week_id, active_date)) => week_view(week_id, active_date, 0, "Week opened."),
        Err(err) => WeekViewResponse::failure(format!("planner_open_week failed: {err}")),
    }
}

/// Moves from `current_week_id` one week in `direction` (`prev|next`).
#[flutter_rust_bridge::frb(sync)]
pub fn planner_navigate(current_week_id: String, direction: String) -> WeekViewResponse {
    let Some(direction) = WeekDirection::parse(&direction) else {
        return WeekViewResponse::failure(format!("unknown direction `{direction}`"));
    };
    let anchor = match parse_week_id(&current_week_id) {
        Ok(monday) => monday,
        Err(err) => return WeekViewResponse::failure(err.to_string()),
    };

    let result = with_session(anchor, |session| {
        session.navigate(direction).map_err(|err| err.to_string())?;
        Ok((session.current_week_id().to_string(), session.active_date()))
    });
    match result {
        Ok((week_id, active_date)) => week_view(week_id, active_date, 0, "Week changed."),
        Err(err) => WeekViewResponse::failure(format!("planner_navigate failed: {err}")),
    }
}

/// Starts the week after `current_week_id`, carrying open tasks forward.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_start_next_week(current_week_id: String) -> WeekViewResponse {
    let anchor = match parse_week_id(&current_week_id) {
        Ok(monday) => monday,
        Err(err) => return WeekViewResponse::failure(err.to_string()),
    };

    let result = with_session(anchor, |session| {
        let outcome = session.start_next_week().map_err(|err| err.to_string())?;
        Ok((outcome, session.active_date()))
    });
    match result {
        Ok((outcome, active_date)) => {
            let carried = to_u32(outcome.carried_task_ids.len());
            let message = if outcome.created_week {
                format!("Started new week with {carried} carried task(s).")
            } else {
                "Week already started.".to_string()
            };
            week_view(outcome.week_id, active_date, carried, message)
        }
        Err(err) => WeekViewResponse::failure(format!("planner_start_next_week failed: {err}")),
    }
}

/// Lists tasks for `date` on `board` (`all|todos|exercise|dinner`).
#[flutter_rust_bridge::frb(sync)]
pub fn planner_tasks_for(date: String, board: String) -> TaskListResponse {
    let parsed = parse_date(&date).and_then(|date| {
        BoardFilter::parse(&board)
            .map(|filter| (date, filter))
            .ok_or_else(|| format!("unknown board `{board}`"))
    });
    let (date, filter) = match parsed {
        Ok(value) => value,
        Err(message) => return TaskListResponse::failure(message),
    };

    let result = with_session(date, |session| {
        Ok(session
            .tasks_for(date, filter)
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => TaskListResponse::from_items(items),
        Err(err) => TaskListResponse::failure(format!("planner_tasks_for failed: {err}")),
    }
}

/// Lists every stored task in collection order.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_all_tasks() -> TaskListResponse {
    let result = with_session(today(), |session| {
        Ok(session.tasks().iter().map(to_task_item).collect::<Vec<_>>())
    });
    match result {
        Ok(items) => TaskListResponse::from_items(items),
        Err(err) => TaskListResponse::failure(format!("planner_all_tasks failed: {err}")),
    }
}

/// Lists every stored week record.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_weeks() -> WeekListResponse {
    let result = with_session(today(), |session| {
        Ok(session.weeks().iter().map(to_week_item).collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = format!("Found {} week(s).", items.len());
            WeekListResponse { items, message }
        }
        Err(err) => WeekListResponse {
            items: Vec::new(),
            message: format!("planner_weeks failed: {err}"),
        },
    }
}

/// Per-day counts for `week_id` on `board` (`all|todos|exercise|dinner`).
#[flutter_rust_bridge::frb(sync)]
pub fn planner_day_counts(week_id: String, board: String) -> DayCountsResponse {
    let failure = |message: String| DayCountsResponse {
        ok: false,
        items: Vec::new(),
        message,
    };
    let Some(filter) = BoardFilter::parse(&board) else {
        return failure(format!("unknown board `{board}`"));
    };
    let anchor = match parse_week_id(&week_id) {
        Ok(monday) => monday,
        Err(err) => return failure(err.to_string()),
    };

    let result = with_session(anchor, |session| {
        session.day_counts(filter).map_err(|err| err.to_string())
    });
    match result {
        Ok(counts) => DayCountsResponse {
            ok: true,
            items: counts
                .iter()
                .map(|count| DayCountItem {
                    date: format_date(&count.date),
                    total: to_u32(count.total),
                    open: to_u32(count.open),
                })
                .collect(),
            message: "Counts ready.".to_string(),
        },
        Err(err) => failure(format!("planner_day_counts failed: {err}")),
    }
}

/// Per-board counts for `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_board_counts(date: String) -> BoardCountsResponse {
    let failure = |message: String| BoardCountsResponse {
        ok: false,
        todos: 0,
        exercise: 0,
        dinner: 0,
        message,
    };
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(message) => return failure(message),
    };

    match with_session(date, |session| Ok(session.board_counts())) {
        Ok(counts) => BoardCountsResponse {
            ok: true,
            todos: to_u32(counts.todos),
            exercise: to_u32(counts.exercise),
            dinner: to_u32(counts.dinner),
            message: "Counts ready.".to_string(),
        },
        Err(err) => failure(format!("planner_board_counts failed: {err}")),
    }
}

/// Open/done/skipped totals for the tasks owned by `week_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_week_summary(week_id: String) -> WeekSummaryResponse {
    let failure = |message: String| WeekSummaryResponse {
        ok: false,
        open: 0,
        done: 0,
        skipped: 0,
        message,
    };
    let anchor = match parse_week_id(&week_id) {
        Ok(monday) => monday,
        Err(err) => return failure(err.to_string()),
    };

    match with_session(anchor, |session| Ok(session.week_summary(&week_id))) {
        Ok(summary) => WeekSummaryResponse {
            ok: true,
            open: to_u32(summary.open),
            done: to_u32(summary.done),
            skipped: to_u32(summary.skipped),
            message: "Summary ready.".to_string(),
        },
        Err(err) => failure(format!("planner_week_summary failed: {err}")),
    }
}

fn build_draft(
    title: String,
    board: &str,
    scheduled_for: &str,
    priority: &str,
    notes: Option<String>,
    remind_at: Option<String>,
) -> Result<TaskDraft, String> {
    let board = Board::parse(board).ok_or_else(|| format!("unknown board `{board}`"))?;
    let priority =
        Priority::parse(priority).ok_or_else(|| format!("unknown priority `{priority}`"))?;
    let scheduled_for = parse_date(scheduled_for)?;

    let mut draft = TaskDraft::new(title.trim(), board, scheduled_for, priority);
    if let Some(notes) = non_blank(notes) {
        draft = draft.with_notes(notes);
    }
    if let Some(raw) = non_blank(remind_at) {
        draft = draft.with_reminder(parse_reminder(&raw)?);
    }
    draft.validate().map_err(|err| err.to_string())?;
    Ok(draft)
}

struct PatchFields {
    title: Option<String>,
    board: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    scheduled_for: Option<String>,
    notes: Option<String>,
    remind_at: Option<String>,
}

fn build_patch(fields: PatchFields) -> Result<TaskPatch, String> {
    let PatchFields {
        title,
        board,
        status,
        priority,
        scheduled_for,
        notes,
        remind_at,
    } = fields;

    let mut patch = TaskPatch::default();
    if let Some(title) = title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err("task title must not be blank".to_string());
        }
        patch.title = Some(title);
    }
    if let Some(raw) = board {
        patch.board = Some(Board::parse(&raw).ok_or_else(|| format!("unknown board `{raw}`"))?);
    }
    if let Some(raw) = status {
        patch.status =
            Some(TaskStatus::parse(&raw).ok_or_else(|| format!("unknown status `{raw}`"))?);
    }
    if let Some(raw) = priority {
        patch.priority =
            Some(Priority::parse(&raw).ok_or_else(|| format!("unknown priority `{raw}`"))?);
    }
    if let Some(raw) = scheduled_for {
        patch.scheduled_for = Some(parse_date(&raw)?);
    }
    if let Some(raw) = notes {
        patch.notes = Some(non_blank(Some(raw)));
    }
    if let Some(raw) = remind_at {
        let reminder = non_blank(Some(raw))
            .map(|raw| parse_reminder(&raw))
            .transpose()?;
        patch.remind_at = Some(reminder);
    }
    Ok(patch)
}

fn week_view(
    week_id: String,
    active_date: NaiveDate,
    carried_count: u32,
    message: impl Into<String>,
) -> WeekViewResponse {
    let dates = match week_dates(&week_id) {
        Ok(dates) => dates.iter().map(format_date).collect(),
        Err(err) => return WeekViewResponse::failure(err.to_string()),
    };
    WeekViewResponse {
        ok: true,
        week_id: Some(week_id),
        dates,
        active_date: Some(format_date(&active_date)),
        carried_count,
        message: message.into(),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        board: task.board.as_str().to_string(),
        title: task.title.clone(),
        notes: task.notes.clone(),
        status: task.status.as_str().to_string(),
        priority: task.priority.as_str().to_string(),
        scheduled_for: format_date(&task.scheduled_for),
        week_id: task.week_id.clone(),
        remind_at: task
            .remind_at
            .map(|at| at.format(REMINDER_FORMATS[0]).to_string()),
        metadata: task
            .metadata
            .iter()
            .flat_map(|metadata| metadata.iter())
            .map(|(key, value)| MetadataEntry {
                key: key.to_string(),
                value: value.to_string(),
            })
            .collect(),
    }
}

fn to_week_item(week: &Week) -> WeekItem {
    WeekItem {
        id: week.id.clone(),
        start_date: format_date(&week.start_date),
        end_date: format_date(&week.end_date),
    }
}

fn to_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date `{raw}`; expected YYYY-MM-DD"))
}

fn parse_reminder(raw: &str) -> Result<NaiveDateTime, String> {
    REMINDER_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .ok_or_else(|| format!("invalid reminder `{raw}`; expected YYYY-MM-DDTHH:MM[:SS]"))
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            default_db_path()
        })
        .clone()
}

#[cfg(not(test))]
fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DB_FILE_NAME)
}

#[cfg(test)]
fn default_db_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!(
        "weekplan-ffi-{}-{nanos}-{DB_FILE_NAME}",
        std::process::id()
    ))
}

fn with_session<T>(
    anchor: NaiveDate,
    f: impl FnOnce(&mut PlannerSession<SqliteKeyValueStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = SESSION_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(resolve_db_path()).map_err(|err| format!("planner DB open failed: {err}"))?;
    let mut session = PlannerSession::load(SqliteKeyValueStore::new(&conn), anchor)
        .map_err(|err| format!("planner session load failed: {err}"))?;
    f(&mut session)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, planner_add_task, planner_all_tasks,
        planner_board_counts, planner_day_counts, planner_delete_task, planner_navigate,
        planner_open_week, planner_start_next_week, planner_tasks_for, planner_toggle_task,
        planner_update_task, planner_week_summary, planner_weeks, to_task_item,
    };
    use chrono::{NaiveDate, Utc};
    use weekplan_core::{Board, Priority, Task, TaskDraft, TaskMetadata};

    fn add(title: &str, board: &str, date: &str) -> String {
        let response = planner_add_task(
            title.to_string(),
            board.to_string(),
            date.to_string(),
            "med".to_string(),
            None,
            None,
        );
        assert!(response.ok, "{}", response.message);
        response.task_id.expect("add should return task_id")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_rejects_blank_title_and_bad_inputs() {
        let blank = planner_add_task(
            "   ".to_string(),
            "todos".to_string(),
            "2030-01-02".to_string(),
            "low".to_string(),
            None,
            None,
        );
        assert!(!blank.ok);
        assert!(blank.message.contains("blank"));

        let bad_board = planner_add_task(
            "Chores".to_string(),
            "garden".to_string(),
            "2030-01-02".to_string(),
            "low".to_string(),
            None,
            None,
        );
        assert!(!bad_board.ok);

        let bad_reminder = planner_add_task(
            "Chores".to_string(),
            "todos".to_string(),
            "2030-01-02".to_string(),
            "low".to_string(),
            None,
            Some("tomorrow".to_string()),
        );
        assert!(!bad_reminder.ok);
    }

    #[test]
    fn added_task_is_listed_and_toggled_to_the_end() {
        let first = add("Oatmeal", "dinner", "2030-02-06");
        let second = add("Risotto", "dinner", "2030-02-06");

        let toggled = planner_toggle_task(first.clone());
        assert!(toggled.ok, "{}", toggled.message);

        let listed = planner_tasks_for("2030-02-06".to_string(), "dinner".to_string());
        let ids: Vec<&str> = listed.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
        assert_eq!(listed.items[1].status, "done");
        assert_eq!(listed.items[0].week_id, "week-2030-02-04");
    }

    #[test]
    fn update_and_delete_tolerate_unknown_ids() {
        let update = planner_update_task(
            "missing".to_string(),
            None,
            None,
            Some("done".to_string()),
            None,
            None,
            None,
            None,
        );
        assert!(update.ok);
        assert_eq!(update.task_id, None);

        let delete = planner_delete_task("missing".to_string());
        assert!(delete.ok);
        assert_eq!(delete.task_id, None);
    }

    #[test]
    fn update_then_delete_existing_task() {
        let id = add("Pushups", "exercise", "2030-03-05");

        let update = planner_update_task(
            id.clone(),
            Some("Pushups x50".to_string()),
            None,
            Some("skipped".to_string()),
            Some("high".to_string()),
            None,
            Some("after work".to_string()),
            None,
        );
        assert!(update.ok, "{}", update.message);

        let listed = planner_tasks_for("2030-03-05".to_string(), "exercise".to_string());
        let item = listed.items.iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.title, "Pushups x50");
        assert_eq!(item.status, "skipped");
        assert_eq!(item.priority, "high");
        assert_eq!(item.notes.as_deref(), Some("after work"));
        assert!(item.metadata.is_empty());

        assert!(planner_delete_task(id.clone()).ok);
        let after = planner_tasks_for("2030-03-05".to_string(), "all".to_string());
        assert!(after.items.iter().all(|item| item.id != id));
    }

    #[test]
    fn navigate_returns_adjacent_week_view() {
        let view = planner_navigate("week-2030-04-01".to_string(), "next".to_string());
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.week_id.as_deref(), Some("week-2030-04-08"));
        assert_eq!(view.dates.len(), 7);
        assert_eq!(view.dates[6], "2030-04-14");
        assert_eq!(view.active_date.as_deref(), Some("2030-04-08"));

        let bad = planner_navigate("week-2030-04-01".to_string(), "up".to_string());
        assert!(!bad.ok);
    }

    #[test]
    fn start_next_week_carries_open_tasks_once() {
        add("Meal plan", "todos", "2030-05-08");

        let first = planner_start_next_week("week-2030-05-06".to_string());
        assert!(first.ok, "{}", first.message);
        assert_eq!(first.week_id.as_deref(), Some("week-2030-05-13"));
        assert_eq!(first.carried_count, 1);

        let second = planner_start_next_week("week-2030-05-06".to_string());
        assert!(second.ok, "{}", second.message);
        assert_eq!(second.carried_count, 0);

        let rolled = planner_tasks_for("2030-05-15".to_string(), "todos".to_string());
        assert_eq!(rolled.items.len(), 1);
        assert_eq!(rolled.items[0].title, "Meal plan");
    }

    #[test]
    fn reading_next_week_does_not_block_rollover() {
        add("Plan trip", "todos", "2031-06-04");

        let preview = planner_tasks_for("2031-06-11".to_string(), "all".to_string());
        assert!(preview.items.is_empty(), "{}", preview.message);
        let counts = planner_board_counts("2031-06-11".to_string());
        assert!(counts.ok, "{}", counts.message);
        assert!(planner_weeks()
            .items
            .iter()
            .all(|week| week.id != "week-2031-06-09"));

        let rolled = planner_start_next_week("week-2031-06-02".to_string());
        assert!(rolled.ok, "{}", rolled.message);
        assert_eq!(rolled.carried_count, 1);
    }

    #[test]
    fn open_week_creates_the_week_record_once() {
        let opened = planner_open_week("2031-09-18".to_string());
        assert!(opened.ok, "{}", opened.message);
        assert_eq!(opened.week_id.as_deref(), Some("week-2031-09-15"));
        assert_eq!(opened.active_date.as_deref(), Some("2031-09-18"));

        assert!(planner_open_week("2031-09-21".to_string()).ok);
        let weeks = planner_weeks();
        let matching: Vec<_> = weeks
            .items
            .iter()
            .filter(|week| week.id == "week-2031-09-15")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].start_date, "2031-09-15");
        assert_eq!(matching[0].end_date, "2031-09-21");

        assert!(!planner_open_week("someday".to_string()).ok);
    }

    #[test]
    fn update_moves_board_date_and_reminder() {
        let id = add("Stretch", "todos", "2031-07-08");

        let moved = planner_update_task(
            id.clone(),
            None,
            Some("exercise".to_string()),
            None,
            None,
            Some("2031-07-16".to_string()),
            None,
            Some("2031-07-16T07:30".to_string()),
        );
        assert!(moved.ok, "{}", moved.message);

        let listed = planner_tasks_for("2031-07-16".to_string(), "exercise".to_string());
        let item = listed.items.iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.board, "exercise");
        assert_eq!(item.scheduled_for, "2031-07-16");
        assert_eq!(item.week_id, "week-2031-07-07");
        assert_eq!(item.remind_at.as_deref(), Some("2031-07-16T07:30:00"));

        let cleared = planner_update_task(
            id.clone(),
            None,
            None,
            None,
            None,
            None,
            None,
            Some(String::new()),
        );
        assert!(cleared.ok, "{}", cleared.message);
        let listed = planner_tasks_for("2031-07-16".to_string(), "all".to_string());
        let item = listed.items.iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.remind_at, None);

        let bad = planner_update_task(
            id,
            None,
            Some("garden".to_string()),
            None,
            None,
            Some("2031-07-32".to_string()),
            None,
            None,
        );
        assert!(!bad.ok);
    }

    #[test]
    fn counts_and_summary_reflect_stored_tasks() {
        let open = add("Squats", "exercise", "2031-08-05");
        add("Soup", "dinner", "2031-08-05");
        let finished = add("Laundry", "todos", "2031-08-07");
        assert!(planner_toggle_task(finished).ok);

        let days = planner_day_counts("week-2031-08-04".to_string(), "all".to_string());
        assert!(days.ok, "{}", days.message);
        assert_eq!(days.items.len(), 7);
        assert_eq!(days.items[1].date, "2031-08-05");
        assert_eq!((days.items[1].total, days.items[1].open), (2, 2));
        assert_eq!((days.items[3].total, days.items[3].open), (1, 0));

        let exercise = planner_day_counts("week-2031-08-04".to_string(), "exercise".to_string());
        assert_eq!(exercise.items[1].total, 1);
        assert!(!planner_day_counts("week-2031-08-05".to_string(), "all".to_string()).ok);

        let boards = planner_board_counts("2031-08-05".to_string());
        assert!(boards.ok, "{}", boards.message);
        assert_eq!((boards.todos, boards.exercise, boards.dinner), (0, 1, 1));

        let summary = planner_week_summary("week-2031-08-04".to_string());
        assert!(summary.ok, "{}", summary.message);
        assert_eq!((summary.open, summary.done, summary.skipped), (2, 1, 0));

        let all = planner_all_tasks();
        assert!(all.items.iter().any(|item| item.id == open));
    }

    #[test]
    fn task_item_lists_metadata_in_key_order() {
        let metadata: TaskMetadata = [("source", "import"), ("servings", "4")]
            .into_iter()
            .collect();
        let date = NaiveDate::from_ymd_opt(2031, 10, 1).unwrap();
        let draft =
            TaskDraft::new("Chili", Board::Dinner, date, Priority::Low).with_metadata(metadata);
        let item = to_task_item(&Task::from_draft(draft, Utc::now()).unwrap());

        let entries: Vec<(&str, &str)> = item
            .metadata
            .iter()
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
            .collect();
        assert_eq!(entries, vec![("servings", "4"), ("source", "import")]);
        assert_eq!(item.priority, "low");
        assert_eq!(item.week_id, "week-2031-09-29");
    }
}
