//! Import summaries.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::ImportError;
use crate::membership::NameSetDiff;
use crate::orchestrator::ImportPhase;

/// What the import of one realm changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Realm name.
    pub realm: String,
    /// Last phase reached.
    pub phase: ImportPhase,
    /// Roles created.
    pub roles_created: usize,
    /// Roles whose scalar fields were updated.
    pub roles_updated: usize,
    /// Groups created, subgroups included.
    pub groups_created: usize,
    /// Groups whose attributes were updated.
    pub groups_updated: usize,
    /// Groups deleted with their subtrees.
    pub groups_deleted: usize,
    /// Role mappings added to groups.
    pub role_mappings_added: usize,
    /// Role mappings removed from groups.
    pub role_mappings_removed: usize,
    /// Composite members added to roles.
    pub composites_added: usize,
    /// Composite members removed from roles.
    pub composites_removed: usize,
    /// When the import started.
    pub started_at: DateTime<Utc>,
    /// When the import finished, successfully or not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ImportSummary {
    /// Starts a summary for a realm.
    #[must_use]
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            phase: ImportPhase::RolesPending,
            roles_created: 0,
            roles_updated: 0,
            groups_created: 0,
            groups_updated: 0,
            groups_deleted: 0,
            role_mappings_added: 0,
            role_mappings_removed: 0,
            composites_added: 0,
            composites_removed: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Counts a group role-mapping change.
    pub fn record_mappings(&mut self, diff: &NameSetDiff) {
        self.role_mappings_added += diff.to_add.len();
        self.role_mappings_removed += diff.to_remove.len();
    }

    /// Counts a composite change.
    pub fn record_composites(&mut self, diff: &NameSetDiff) {
        self.composites_added += diff.to_add.len();
        self.composites_removed += diff.to_remove.len();
    }

    /// Marks the summary as finished.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Total number of changed entities and memberships.
    #[must_use]
    pub const fn changes(&self) -> usize {
        self.roles_created
            + self.roles_updated
            + self.groups_created
            + self.groups_updated
            + self.groups_deleted
            + self.role_mappings_added
            + self.role_mappings_removed
            + self.composites_added
            + self.composites_removed
    }

    /// Checks if the realm was already converged.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.changes() == 0
    }

    /// How long the import took, once finished.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }
}

/// A realm import that stopped at an error.
#[derive(Debug)]
pub struct RealmFailure {
    /// What had been changed before the error, and the phase it occurred in.
    pub summary: ImportSummary,
    /// The error.
    pub error: ImportError,
}

/// Outcome of importing several realms in sequence.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Realms imported successfully, in order.
    pub completed: Vec<ImportSummary>,
    /// The realm that failed, if any. No realm after it was attempted.
    pub failure: Option<RealmFailure>,
}

impl ImportReport {
    /// Checks if every realm was imported.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts the report into the completed summaries or the error.
    pub fn into_result(self) -> Result<Vec<ImportSummary>, ImportError> {
        match self.failure {
            Some(failure) => Err(failure.error),
            None => Ok(self.completed),
        }
    }
}
