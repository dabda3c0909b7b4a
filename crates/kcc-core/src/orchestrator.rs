//! Realm import sequencing.

use std::fmt;

use kcc_model::RealmImport;
use kcc_remote::RemoteState;
use serde::Serialize;

use crate::error::{ImportError, ImportResult};
use crate::group::GroupReconciler;
use crate::role::RoleReconciler;
use crate::summary::{ImportReport, ImportSummary, RealmFailure};

/// Progress of one realm import.
///
/// Roles always go first: group role mappings resolve role names, which
/// must exist by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportPhase {
    /// Roles not yet reconciled.
    RolesPending,
    /// Roles reconciled.
    RolesDone,
    /// Groups being reconciled.
    GroupsPending,
    /// Everything reconciled.
    GroupsDone,
}

impl ImportPhase {
    /// The phase that follows this one.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::RolesPending => Some(Self::RolesDone),
            Self::RolesDone => Some(Self::GroupsPending),
            Self::GroupsPending => Some(Self::GroupsDone),
            Self::GroupsDone => None,
        }
    }

    /// Checks if the import ran to completion.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::GroupsDone)
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RolesPending => "roles pending",
            Self::RolesDone => "roles done",
            Self::GroupsPending => "groups pending",
            Self::GroupsDone => "groups done",
        };
        f.write_str(name)
    }
}

/// Imports realm documents into a remote instance.
pub struct RealmImporter<'a, R: ?Sized> {
    remote: &'a R,
}

impl<'a, R> RealmImporter<'a, R>
where
    R: RemoteState + ?Sized,
{
    /// Creates an importer.
    pub fn new(remote: &'a R) -> Self {
        Self { remote }
    }

    /// Imports one realm document.
    ///
    /// ## Errors
    ///
    /// Stops at the first error. Whatever was applied before it stays
    /// applied; running the import again continues from there.
    pub async fn import_realm(&self, import: &RealmImport) -> ImportResult<ImportSummary> {
        let (summary, result) = self.run(import).await;
        result.map(|()| summary)
    }

    /// Imports realm documents in order, stopping at the first failure.
    pub async fn import_all(&self, imports: &[RealmImport]) -> ImportReport {
        let mut report = ImportReport::default();

        for import in imports {
            let (summary, result) = self.run(import).await;
            match result {
                Ok(()) => report.completed.push(summary),
                Err(error) => {
                    tracing::error!(
                        realm = %summary.realm,
                        phase = %summary.phase,
                        error = %error,
                        "Realm import failed"
                    );
                    report.failure = Some(RealmFailure { summary, error });
                    break;
                }
            }
        }

        report
    }

    async fn run(&self, import: &RealmImport) -> (ImportSummary, ImportResult<()>) {
        let mut summary = ImportSummary::new(&import.realm);
        let result = self.run_phases(import, &mut summary).await;
        summary.complete();
        (summary, result)
    }

    async fn run_phases(&self, import: &RealmImport, summary: &mut ImportSummary) -> ImportResult<()> {
        if import.realm.trim().is_empty() {
            return Err(ImportError::InvalidImport("realm name is empty".to_string()));
        }
        import.validate().map_err(ImportError::InvalidImport)?;

        let realm = import.realm.as_str();
        tracing::info!(realm, "Importing realm");

        if let Some(roles) = &import.roles {
            RoleReconciler::new(self.remote, realm)
                .reconcile_roles(roles, summary)
                .await?;
        }
        advance(summary);

        advance(summary);
        GroupReconciler::new(self.remote, realm)
            .reconcile_groups(import.groups.as_deref(), summary)
            .await?;
        advance(summary);

        tracing::info!(
            realm,
            changes = summary.changes(),
            "Realm import finished"
        );
        Ok(())
    }
}

fn advance(summary: &mut ImportSummary) {
    if let Some(next) = summary.phase.next() {
        tracing::info!(realm = %summary.realm, phase = %next, "Import phase");
        summary.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_run_in_fixed_order() {
        let mut phase = ImportPhase::RolesPending;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }

        assert_eq!(
            seen,
            vec![
                ImportPhase::RolesPending,
                ImportPhase::RolesDone,
                ImportPhase::GroupsPending,
                ImportPhase::GroupsDone,
            ]
        );
        assert!(phase.is_done());
    }

    #[test]
    fn phase_display() {
        assert_eq!(ImportPhase::GroupsPending.to_string(), "groups pending");
    }
}
