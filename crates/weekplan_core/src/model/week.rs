//! Week domain model.
//!
//! # Invariants
//! - `start_date` is the Monday embedded in `id`.
//! - `end_date` is always `start_date + 6 days`.
//! - Week records are immutable after creation.

use crate::model::calendar::{week_dates, CalendarError, WeekId, DAYS_PER_WEEK};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Persisted Monday-Sunday period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub id: WeekId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Week {
    /// Builds the week record for an identifier.
    ///
    /// # Errors
    /// Returns `CalendarError` when `id` is not a valid week identifier.
    pub fn for_id(id: &str, now: DateTime<Utc>) -> Result<Self, CalendarError> {
        let dates = week_dates(id)?;
        Ok(Self {
            id: id.to_string(),
            start_date: dates[0],
            end_date: dates[DAYS_PER_WEEK - 1],
            created_at: now,
        })
    }
}
