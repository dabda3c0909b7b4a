//! Output formatting utilities.

use colored::Colorize;
use kcc_core::ImportSummary;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// One table row per realm.
#[derive(Debug, Tabled, Serialize)]
pub struct SummaryRow {
    /// Realm name.
    #[tabled(rename = "Realm")]
    pub realm: String,
    /// Last phase reached.
    #[tabled(rename = "Phase")]
    pub phase: String,
    /// Roles created/updated.
    #[tabled(rename = "Roles +/~")]
    pub roles: String,
    /// Groups created/updated/deleted.
    #[tabled(rename = "Groups +/~/-")]
    pub groups: String,
    /// Role mappings added/removed.
    #[tabled(rename = "Mappings +/-")]
    pub mappings: String,
    /// Composites added/removed.
    #[tabled(rename = "Composites +/-")]
    pub composites: String,
}

impl From<&ImportSummary> for SummaryRow {
    fn from(summary: &ImportSummary) -> Self {
        Self {
            realm: summary.realm.clone(),
            phase: summary.phase.to_string(),
            roles: format!("{}/{}", summary.roles_created, summary.roles_updated),
            groups: format!(
                "{}/{}/{}",
                summary.groups_created, summary.groups_updated, summary.groups_deleted
            ),
            mappings: format!(
                "{}/{}",
                summary.role_mappings_added, summary.role_mappings_removed
            ),
            composites: format!("{}/{}", summary.composites_added, summary.composites_removed),
        }
    }
}

/// Outputs import summaries in the specified format.
pub fn output_summaries(summaries: &[ImportSummary], format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if summaries.is_empty() {
                info("No realm imported.");
            } else {
                let rows: Vec<SummaryRow> = summaries.iter().map(SummaryRow::from).collect();
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(summaries)?;
            println!("{json}");
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Prompts for password input (hidden).
pub fn prompt_password(prompt: &str) -> crate::CliResult<String> {
    rpassword::prompt_password(prompt).map_err(crate::CliError::Io)
}
