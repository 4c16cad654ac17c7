//! Domain model for the weekly planner.
//!
//! # Responsibility
//! - Define task/week records shared by persistence and planner services.
//! - Own the date-to-week identity rules every other layer relies on.
//!
//! # Invariants
//! - Weeks always run Monday through Sunday.
//! - A task references its week only by identifier.

pub mod calendar;
pub mod task;
pub mod week;
