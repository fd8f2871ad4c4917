//! Pure projections over a task snapshot.
//!
//! # Responsibility
//! - Derive list, matrix and dashboard data from `TaskStore::list()` output.
//!
//! # Invariants
//! - No storage access and no side effects; every call recomputes from the
//!   slice it is given.

pub mod filter;
pub mod matrix;
pub mod stats;
