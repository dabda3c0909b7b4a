//! # kcc-core
//!
//! Idempotent reconciliation of realm configuration.
//!
//! Given a parsed realm import document and access to the live remote
//! state, the core computes and applies the minimal set of mutations that
//! makes the remote realm match the document. Running the same import a
//! second time issues no mutation at all.
//!
//! ## Components
//!
//! - [`membership`] - Named-set differences shared by role mappings and composites
//! - [`patch`] - Role deep patch and group attribute replacement
//! - [`composite::CompositeResolver`] - Composite role synchronization
//! - [`role::RoleReconciler`] - Role create/update, then composites
//! - [`group::GroupReconciler`] - Recursive group tree reconciliation
//! - [`orchestrator::RealmImporter`] - Roles before groups, per realm
//!
//! All remote calls are awaited one at a time, in program order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod composite;
pub mod error;
pub mod group;
pub mod membership;
pub mod orchestrator;
pub mod patch;
pub mod role;
pub mod summary;

pub use error::{ImportError, ImportResult};
pub use orchestrator::{ImportPhase, RealmImporter};
pub use summary::{ImportReport, ImportSummary, RealmFailure};
