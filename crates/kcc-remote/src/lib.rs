//! # kcc-remote
//!
//! Access to the live state of an identity-provider realm.
//!
//! The reconciliation core never talks HTTP itself. It consumes the
//! accessor traits defined here, which read and mutate groups, roles and
//! clients of a named realm. Lookups report absence as `Ok(None)`; only
//! transport failures and refused mutations are errors.
//!
//! ## Accessor Traits
//!
//! - [`GroupAccessor`] - Group lookup, CRUD and role mappings
//! - [`RoleAccessor`] - Role lookup, create/update and composites
//! - [`ClientAccessor`] - Client lookup by `client_id`
//! - [`RemoteState`] - All of the above
//!
//! ## Implementations
//!
//! - [`rest::AdminClient`] - The admin REST API
//! - [`memory::InMemoryRealms`] - In-process state for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod group;
pub mod memory;
pub mod rest;
pub mod role;

pub use client::ClientAccessor;
pub use error::{RemoteError, RemoteResult};
pub use group::GroupAccessor;
pub use role::{RoleAccessor, RoleScope};

/// Everything the reconciliation core needs from the remote side.
pub trait RemoteState: GroupAccessor + RoleAccessor + ClientAccessor {}

impl<T> RemoteState for T where T: GroupAccessor + RoleAccessor + ClientAccessor {}
