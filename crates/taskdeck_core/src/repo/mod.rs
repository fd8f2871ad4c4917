//! Durable slot abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key/value contract the task store persists through.
//! - Isolate SQLite details from store orchestration.
//!
//! # Invariants
//! - A slot holds one opaque UTF-8 blob; writes replace it whole.
//! - Reading an absent slot is `Ok(None)`, not an error.

pub mod slot_repo;
