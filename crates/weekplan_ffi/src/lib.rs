//! Flutter-facing bindings for the weekly planner core.

pub mod api;
