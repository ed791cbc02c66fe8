//! Validated intents for the presentation layer.
//!
//! Every intent checks its raw arguments first, then loads the stored document
//! (or the seed), applies one pure transition from [`crate::mutation`], and
//! saves the result before returning it. Invalid input never touches the
//! store; unknown ids are silent no-ops.

use crate::config::{self, Config};
use crate::error::AppError;
use crate::model::{Document, Module, StatusFilter, Task, TaskStatus, Theme, Title};
use crate::mutation;
use crate::storage::json_store::{self, DocumentLoad};
use crate::view::{self, DocumentView};
use log::debug;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Where the document lives and how to seed it.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    config: Config,
}

impl Store {
    pub fn new<P: Into<PathBuf>>(path: P, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Resolves the store path and config file from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let path = json_store::store_path()?;
        let config = config::load_config_with_fallback().config;
        Ok(Self::new(path, config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}

pub fn load(store: &Store) -> DocumentLoad {
    json_store::load_document_or_seed(&store.path, || {
        store.config.seed_document(OffsetDateTime::now_utc())
    })
}

pub fn current(store: &Store) -> Document {
    load(store).document
}

/// Like [`current`], but a seed substituted for a missing file is saved so the
/// ids it hands out stay valid for later intents. A corrupt file is left alone
/// until the next intent overwrites it.
pub fn open(store: &Store) -> Result<Document, AppError> {
    let DocumentLoad {
        document,
        seeded,
        error,
    } = load(store);
    if seeded && error.is_none() {
        commit(store, "open", &document)?;
    }
    Ok(document)
}

/// The document as presented: filtered tasks plus per-module and overall
/// progress. Goes through [`open`], so a fresh seed is saved.
pub fn view(store: &Store) -> Result<DocumentView, AppError> {
    Ok(view::document_view(&open(store)?))
}


pub fn create_module(store: &Store, title: &str) -> Result<Module, AppError> {
    let title = Title::parse(title)?;
    let document = current(store);
    let (next, module) = mutation::create_module(&document, &title, OffsetDateTime::now_utc());
    commit(store, "create_module", &next)?;
    Ok(module)
}

pub fn edit_module(store: &Store, module_id: &str, title: &str) -> Result<Document, AppError> {
    let module_id = require_id(module_id, "module id")?;
    let title = Title::parse(title)?;
    apply(store, "edit_module", |document, now| {
        mutation::edit_module(document, module_id, &title, now)
    })
}

/// Removes a module and its tasks. Callers confirm with the user first.
pub fn delete_module(store: &Store, module_id: &str) -> Result<Document, AppError> {
    let module_id = require_id(module_id, "module id")?;
    apply(store, "delete_module", |document, _| {
        mutation::delete_module(document, module_id)
    })
}

pub fn toggle_collapse(store: &Store, module_id: &str) -> Result<Document, AppError> {
    let module_id = require_id(module_id, "module id")?;
    apply(store, "toggle_collapse", |document, _| {
        mutation::toggle_collapse(document, module_id)
    })
}

pub fn create_task(store: &Store, module_id: &str, title: &str) -> Result<Option<Task>, AppError> {
    let module_id = require_id(module_id, "module id")?;
    let title = Title::parse(title)?;
    let document = current(store);
    let (next, task) =
        mutation::create_task(&document, module_id, &title, OffsetDateTime::now_utc());
    commit(store, "create_task", &next)?;
    Ok(task)
}

pub fn edit_task(
    store: &Store,
    module_id: &str,
    task_id: &str,
    title: &str,
) -> Result<Document, AppError> {
    let module_id = require_id(module_id, "module id")?;
    let task_id = require_id(task_id, "task id")?;
    let title = Title::parse(title)?;
    apply(store, "edit_task", |document, now| {
        mutation::edit_task(document, module_id, task_id, &title, now)
    })
}

pub fn change_task_status(
    store: &Store,
    module_id: &str,
    task_id: &str,
    status: &str,
) -> Result<Document, AppError> {
    let module_id = require_id(module_id, "module id")?;
    let task_id = require_id(task_id, "task id")?;
    let status: TaskStatus = status.parse()?;
    apply(store, "change_task_status", |document, now| {
        mutation::change_task_status(document, module_id, task_id, status, now)
    })
}

pub fn reorder_task(
    store: &Store,
    module_id: &str,
    from: usize,
    to: usize,
) -> Result<Document, AppError> {
    let module_id = require_id(module_id, "module id")?;
    apply(store, "reorder_task", |document, now| {
        mutation::reorder_task(document, module_id, from, to, now)
    })
}

/// Removes one task. Callers confirm with the user first.
pub fn delete_task(store: &Store, module_id: &str, task_id: &str) -> Result<Document, AppError> {
    let module_id = require_id(module_id, "module id")?;
    let task_id = require_id(task_id, "task id")?;
    apply(store, "delete_task", |document, now| {
        mutation::delete_task(document, module_id, task_id, now)
    })
}

pub fn set_filter(store: &Store, filter: &str) -> Result<Document, AppError> {
    let filter: StatusFilter = filter.parse()?;
    apply(store, "set_filter", |document, _| {
        mutation::set_filter(document, filter)
    })
}

pub fn set_theme(store: &Store, theme: &str) -> Result<Document, AppError> {
    let theme: Theme = theme.parse()?;
    apply(store, "set_theme", |document, _| {
        mutation::set_theme(document, theme)
    })
}

pub fn toggle_theme(store: &Store) -> Result<Document, AppError> {
    apply(store, "toggle_theme", |document, _| {
        mutation::toggle_theme(document)
    })
}

fn apply<F>(store: &Store, intent: &str, transition: F) -> Result<Document, AppError>
where
    F: FnOnce(&Document, OffsetDateTime) -> Document,
{
    let document = current(store);
    let next = transition(&document, OffsetDateTime::now_utc());
    commit(store, intent, &next)?;
    Ok(next)
}

fn commit(store: &Store, intent: &str, document: &Document) -> Result<(), AppError> {
    json_store::save_document(&store.path, document)?;
    debug!("event=intent module=tracker_api name={intent} status=ok");
    Ok(())
}

fn require_id<'a>(raw: &'a str, what: &str) -> Result<&'a str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{what} is required")));
    }
    Ok(trimmed)
}
