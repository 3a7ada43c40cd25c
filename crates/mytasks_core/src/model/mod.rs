//! Domain model for users and their task lists.
//!
//! # Responsibility
//! - Define immutable value objects shared by repositories and services.
//! - Validate at construction time so invalid values never reach storage.
//!
//! # Invariants
//! - A `Task` never carries its owner; ownership lives in the task store.
//! - A `Task` title is trimmed and non-empty.

pub mod task;
pub mod user;
