//! Import command implementation.

use kcc_core::RealmImporter;
use kcc_model::RealmImport;
use kcc_remote::rest::AdminClient;

use crate::cli::{ConnectionArgs, ImportArgs};
use crate::config::OutputFormat;
use crate::loader::load_documents;
use crate::output::{error, info, output_summaries, success};
use crate::{CliConfig, CliResult};

use super::admin_client_config;

/// Runs the import command.
pub async fn run_import(
    args: ImportArgs,
    config: &CliConfig,
    connection: &ConnectionArgs,
    format: OutputFormat,
) -> CliResult<()> {
    // Parse everything before touching the server.
    let documents = load_documents(&args.paths, args.realm.as_deref())?;
    let imports: Vec<RealmImport> = documents.into_iter().map(|d| d.import).collect();

    let settings = admin_client_config(config, connection)?;
    let client = AdminClient::connect(&settings).await?;

    let quiet = matches!(format, OutputFormat::Quiet);
    if !quiet {
        info(&format!(
            "Importing {} realm document(s) into {}...",
            imports.len(),
            client.base_url()
        ));
    }

    let report = RealmImporter::new(&client).import_all(&imports).await;

    let mut summaries = report.completed.clone();
    if let Some(failure) = &report.failure {
        summaries.push(failure.summary.clone());
    }
    output_summaries(&summaries, format)?;

    match report.into_result() {
        Ok(completed) => {
            if !quiet {
                let unchanged = completed.iter().filter(|s| s.is_unchanged()).count();
                success(&format!(
                    "Imported {} realm(s), {} already up to date",
                    completed.len(),
                    unchanged
                ));
            }
            Ok(())
        }
        Err(e) => {
            if let Some(last) = summaries.last() {
                error(&format!("Realm '{}' stopped at phase '{}'", last.realm, last.phase));
            }
            Err(e.into())
        }
    }
}
