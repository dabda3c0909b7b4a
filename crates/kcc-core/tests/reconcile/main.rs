//! Reconciliation scenario tests.
//!
//! These tests run whole realm imports against in-memory realms and check
//! both the resulting state and the mutations it took to get there.

mod common;
mod groups;
mod idempotence;
mod roles;
