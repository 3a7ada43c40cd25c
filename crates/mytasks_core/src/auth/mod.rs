//! Authentication and authorization gates.
//!
//! # Responsibility
//! - Turn a (name, secret) pair into a `Principal` with its role set.
//! - Decide whether a principal may mutate a given task.
//!
//! # Invariants
//! - Nothing here keeps per-request state; every call re-checks from stores.
//! - Both gates fail closed: store errors are returned, never treated as
//!   success.

pub mod credentials;
pub mod ownership;
