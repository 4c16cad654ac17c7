//! Planner use-case services.
//!
//! # Responsibility
//! - Own the session-scoped task/week collections.
//! - Expose CRUD, week navigation, rollover and display queries.
//!
//! # See also
//! - `model::calendar` for week identity rules.

pub mod planner;
pub mod query;
pub mod rollover;
