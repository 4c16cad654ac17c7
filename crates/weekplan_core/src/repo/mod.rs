//! Persistence boundary for planner collections.
//!
//! # Responsibility
//! - Define the opaque key-value contract the planner writes through.
//! - Serialize whole task/week collections to and from text.
//!
//! # Invariants
//! - Every write replaces a full collection; there are no partial writes.
//! - Unreadable collection text degrades to an empty list.

pub mod collection_repo;
pub mod kv_store;
