//! # kcc-model
//!
//! Representations of the realm configuration that `kcc` reconciles.
//!
//! The same types describe both sides of a reconciliation: the desired
//! state parsed from a realm import document, and the remote state
//! returned by the identity provider's admin API. Collections are
//! `Option`s throughout so that an omitted field ("leave alone") can be
//! told apart from an empty one ("clear").
//!
//! ## Types
//!
//! - [`GroupRepresentation`] - A group and its whole subgroup tree
//! - [`GroupPath`] - Slash-separated group paths
//! - [`RoleRepresentation`] - A realm or client role with its composites
//! - [`ClientRepresentation`] - A client, used to qualify role scopes
//! - [`RealmImport`] - One realm import document

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod group;
pub mod realm;
pub mod role;

pub use client::ClientRepresentation;
pub use group::{Attributes, GroupPath, GroupRepresentation};
pub use realm::{RealmImport, RolesImport};
pub use role::{Composites, RoleRepresentation};
