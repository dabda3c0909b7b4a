//! Import document loading.
//!
//! A path is either a JSON file holding one realm document, or a directory
//! whose `*.json` files are loaded in file-name order. Subdirectories are
//! not descended into.

use std::path::{Path, PathBuf};

use kcc_model::RealmImport;

use crate::{CliError, CliResult};

/// A parsed realm document and the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Source file.
    pub path: PathBuf,
    /// Parsed document.
    pub import: RealmImport,
}

/// Loads every document reachable from `paths`, in order.
///
/// When `realm` is given it replaces the realm name of every document.
pub fn load_documents(paths: &[PathBuf], realm: Option<&str>) -> CliResult<Vec<LoadedDocument>> {
    let mut documents = Vec::new();

    for file in expand_paths(paths)? {
        let mut import = read_document(&file)?;
        if let Some(realm) = realm {
            import.realm = realm.to_string();
        }
        tracing::debug!(path = %file.display(), realm = %import.realm, "Loaded import document");
        documents.push(LoadedDocument { path: file, import });
    }

    if documents.is_empty() {
        return Err(CliError::InvalidArgument(
            "no import files found".to_string(),
        ));
    }
    Ok(documents)
}

/// Expands directories into their `*.json` files, sorted by file name.
fn expand_paths(paths: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if std::fs::metadata(path)?.is_dir() {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(path)? {
                let entry_path = entry?.path();
                if entry_path.is_file() && is_json(&entry_path) {
                    entries.push(entry_path);
                }
            }
            entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_document(path: &Path) -> CliResult<RealmImport> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })
}
