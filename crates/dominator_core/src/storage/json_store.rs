use crate::error::AppError;
use crate::model::{Document, Module, StatusFilter, Theme};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
pub const STORE_NAMESPACE: &str = "digital-dominator-data";
const STORE_ENV_VAR: &str = "DOMINATOR_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    schema_version: u32,
    modules: Vec<Module>,
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    filter: StatusFilter,
}

/// Outcome of a load that never fails: the document to use, plus the reason
/// the seed was substituted when the stored file could not be trusted.
#[derive(Debug, Clone)]
pub struct DocumentLoad {
    pub document: Document,
    pub seeded: bool,
    pub error: Option<AppError>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let dirs = directories::ProjectDirs::from("", "", "digital-dominator")
        .ok_or_else(|| AppError::invalid_data("could not determine data directory"))?;
    Ok(dirs.data_dir().join(format!("{STORE_NAMESPACE}.json")))
}

/// Reads and validates the stored document.
///
/// A missing file is an `io_error`; anything that does not match the schema is
/// `invalid_data`.
pub fn load_document(path: &Path) -> Result<Document, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let stored: StoredDocument =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    validate_modules(&stored.modules)?;

    Ok(Document {
        modules: stored.modules,
        theme: stored.theme,
        filter: stored.filter,
    })
}

/// Loads the stored document, substituting `seed()` when nothing usable is on
/// disk.
pub fn load_document_or_seed<F>(path: &Path, seed: F) -> DocumentLoad
where
    F: FnOnce() -> Document,
{
    if !path.exists() {
        debug!(
            "event=document_load module=json_store status=seeded reason=missing path={}",
            path.display()
        );
        return DocumentLoad {
            document: seed(),
            seeded: true,
            error: None,
        };
    }

    match load_document(path) {
        Ok(document) => {
            debug!(
                "event=document_load module=json_store status=ok modules={}",
                document.modules.len()
            );
            DocumentLoad {
                document,
                seeded: false,
                error: None,
            }
        }
        Err(err) => {
            warn!(
                "event=document_load module=json_store status=seeded reason={} path={}",
                err.code(),
                path.display()
            );
            DocumentLoad {
                document: seed(),
                seeded: true,
                error: Some(err),
            }
        }
    }
}

pub fn save_document(path: &Path, document: &Document) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredDocument {
        schema_version: SCHEMA_VERSION,
        modules: document.modules.clone(),
        theme: document.theme,
        filter: document.filter,
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    info!(
        "event=document_save module=json_store status=ok modules={}",
        document.modules.len()
    );
    Ok(())
}

fn validate_modules(modules: &[Module]) -> Result<(), AppError> {
    let mut module_ids = HashSet::new();
    for module in modules {
        if !module_ids.insert(module.id.as_str()) {
            return Err(AppError::invalid_data(format!(
                "duplicate module id `{}`",
                module.id
            )));
        }
        if module.title.trim().is_empty() {
            return Err(AppError::invalid_data(format!(
                "module `{}` has an empty title",
                module.id
            )));
        }

        let mut task_ids = HashSet::new();
        for task in &module.tasks {
            if !task_ids.insert(task.id.as_str()) {
                return Err(AppError::invalid_data(format!(
                    "duplicate task id `{}` in module `{}`",
                    task.id, module.id
                )));
            }
            if task.title.trim().is_empty() {
                return Err(AppError::invalid_data(format!(
                    "task `{}` has an empty title",
                    task.id
                )));
            }
        }
    }
    Ok(())
}
