use crate::filter::filter_by_status;
use crate::model::{Document, Module, StatusFilter, Task, Theme};
use crate::progress::{Progress, aggregate_progress, compute_progress};
use serde::Serialize;

/// Everything a renderer needs for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleView {
    pub id: String,
    pub title: String,
    pub is_collapsed: bool,
    pub progress: Progress,
    /// Tasks passing the active filter, in display order.
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    pub theme: Theme,
    pub filter: StatusFilter,
    pub totals: Progress,
    pub modules: Vec<ModuleView>,
}

pub fn module_view(module: &Module, filter: StatusFilter) -> ModuleView {
    ModuleView {
        id: module.id.clone(),
        title: module.title.clone(),
        is_collapsed: module.is_collapsed,
        progress: compute_progress(module),
        tasks: filter_by_status(&module.tasks, filter),
    }
}

pub fn document_view(document: &Document) -> DocumentView {
    DocumentView {
        theme: document.theme,
        filter: document.filter,
        totals: aggregate_progress(document),
        modules: document
            .modules
            .iter()
            .map(|module| module_view(module, document.filter))
            .collect(),
    }
}
