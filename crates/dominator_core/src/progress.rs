use crate::model::{Document, Module, Task, TaskStatus};
use serde::Serialize;

/// Task counts by status plus the share of finished tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub ongoing: usize,
    pub upcoming: usize,
    pub percentage: u32,
}

pub fn compute_progress(module: &Module) -> Progress {
    progress_of(module.tasks.iter())
}

/// Same shape as [`compute_progress`], over every task in the document.
pub fn aggregate_progress(document: &Document) -> Progress {
    progress_of(document.modules.iter().flat_map(|module| module.tasks.iter()))
}

fn progress_of<'a, I>(tasks: I) -> Progress
where
    I: Iterator<Item = &'a Task>,
{
    let mut progress = Progress::default();
    for task in tasks {
        progress.total += 1;
        match task.status {
            TaskStatus::Done => progress.completed += 1,
            TaskStatus::Ongoing => progress.ongoing += 1,
            TaskStatus::Upcoming => progress.upcoming += 1,
        }
    }
    progress.percentage = percentage(progress.completed, progress.total);
    progress
}

/// Rounds `part / whole * 100` half-up; zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u128;
    let whole = whole as u128;
    ((part * 200 + whole) / (whole * 2)) as u32
}
