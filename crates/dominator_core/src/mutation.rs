//! Pure state transitions over a [`Document`].
//!
//! Every function takes the current document by reference and returns a new
//! one; the previous value is never edited in place. References to modules or
//! tasks that no longer exist leave the result equal to the input.

use crate::ids;
use crate::model::{Document, Module, StatusFilter, Task, TaskStatus, Theme, Title, refreshed};
use time::OffsetDateTime;

pub fn new_module(title: &Title, id: String, now: OffsetDateTime) -> Module {
    Module {
        id,
        title: title.to_string(),
        tasks: Vec::new(),
        is_collapsed: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn new_task(title: &Title, id: String, now: OffsetDateTime) -> Task {
    Task {
        id,
        title: title.to_string(),
        status: TaskStatus::Upcoming,
        created_at: now,
        updated_at: now,
    }
}

/// Appends an empty, expanded module and returns it alongside the new document.
pub fn create_module(document: &Document, title: &Title, now: OffsetDateTime) -> (Document, Module) {
    let id = ids::unique_id(|candidate| document.module(candidate).is_some());
    let module = new_module(title, id, now);

    let mut next = document.clone();
    next.modules.push(module.clone());
    (next, module)
}

pub fn edit_module(
    document: &Document,
    module_id: &str,
    title: &Title,
    now: OffsetDateTime,
) -> Document {
    update_module(document, module_id, |module| {
        module.title = title.to_string();
        module.updated_at = refreshed(module.updated_at, now);
    })
}

/// Removes the module together with all of its tasks.
pub fn delete_module(document: &Document, module_id: &str) -> Document {
    let mut next = document.clone();
    next.modules.retain(|module| module.id != module_id);
    next
}

pub fn toggle_collapse(document: &Document, module_id: &str) -> Document {
    update_module(document, module_id, |module| {
        module.is_collapsed = !module.is_collapsed;
    })
}

/// Appends an upcoming task to the module. The task is `None` when the module
/// does not exist.
pub fn create_task(
    document: &Document,
    module_id: &str,
    title: &Title,
    now: OffsetDateTime,
) -> (Document, Option<Task>) {
    let Some(module) = document.module(module_id) else {
        return (document.clone(), None);
    };

    let id = ids::unique_id(|candidate| module.task(candidate).is_some());
    let task = new_task(title, id, now);

    let next = update_module(document, module_id, |module| {
        module.tasks.push(task.clone());
        module.updated_at = refreshed(module.updated_at, now);
    });
    (next, Some(task))
}

pub fn edit_task(
    document: &Document,
    module_id: &str,
    task_id: &str,
    title: &Title,
    now: OffsetDateTime,
) -> Document {
    update_task(document, module_id, task_id, now, |task| {
        task.title = title.to_string();
    })
}

pub fn change_task_status(
    document: &Document,
    module_id: &str,
    task_id: &str,
    status: TaskStatus,
    now: OffsetDateTime,
) -> Document {
    update_task(document, module_id, task_id, now, |task| {
        task.status = status;
    })
}

/// Moves the task at `from` so that it ends up at `to`.
///
/// Out-of-range indices leave the document untouched. `from == to` keeps the
/// order but still refreshes the module's `updated_at`.
pub fn reorder_task(
    document: &Document,
    module_id: &str,
    from: usize,
    to: usize,
    now: OffsetDateTime,
) -> Document {
    let Some(module) = document.module(module_id) else {
        return document.clone();
    };
    let len = module.tasks.len();
    if from >= len || to >= len {
        return document.clone();
    }

    update_module(document, module_id, |module| {
        let task = module.tasks.remove(from);
        module.tasks.insert(to, task);
        module.updated_at = refreshed(module.updated_at, now);
    })
}

pub fn delete_task(
    document: &Document,
    module_id: &str,
    task_id: &str,
    now: OffsetDateTime,
) -> Document {
    let exists = document.task(module_id, task_id).is_some();
    if !exists {
        return document.clone();
    }

    update_module(document, module_id, |module| {
        module.tasks.retain(|task| task.id != task_id);
        module.updated_at = refreshed(module.updated_at, now);
    })
}

pub fn set_filter(document: &Document, filter: StatusFilter) -> Document {
    Document {
        filter,
        ..document.clone()
    }
}

pub fn set_theme(document: &Document, theme: Theme) -> Document {
    Document {
        theme,
        ..document.clone()
    }
}

pub fn toggle_theme(document: &Document) -> Document {
    set_theme(document, document.theme.toggled())
}

fn update_module<F>(document: &Document, module_id: &str, apply: F) -> Document
where
    F: FnOnce(&mut Module),
{
    let mut next = document.clone();
    if let Some(module) = next.modules.iter_mut().find(|module| module.id == module_id) {
        apply(module);
    }
    next
}

// Refreshes both the task and its parent module.
fn update_task<F>(
    document: &Document,
    module_id: &str,
    task_id: &str,
    now: OffsetDateTime,
    apply: F,
) -> Document
where
    F: FnOnce(&mut Task),
{
    let mut next = document.clone();
    let Some(module) = next.modules.iter_mut().find(|module| module.id == module_id) else {
        return next;
    };
    let Some(task) = module.tasks.iter_mut().find(|task| task.id == task_id) else {
        return next;
    };

    apply(task);
    task.updated_at = refreshed(task.updated_at, now);
    module.updated_at = refreshed(module.updated_at, now);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::aggregate_progress;
    use time::Duration;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2025-06-01 9:00 UTC);

    fn title(raw: &str) -> Title {
        Title::parse(raw).unwrap()
    }

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            status,
            created_at: T0,
            updated_at: T0,
        }
    }

    fn document() -> Document {
        Document {
            modules: vec![
                Module {
                    id: "m-1".to_string(),
                    title: "React Fundamentals".to_string(),
                    tasks: vec![
                        task("a", TaskStatus::Done),
                        task("b", TaskStatus::Ongoing),
                        task("c", TaskStatus::Upcoming),
                    ],
                    is_collapsed: false,
                    created_at: T0,
                    updated_at: T0,
                },
                Module {
                    id: "m-2".to_string(),
                    title: "TypeScript Essentials".to_string(),
                    tasks: vec![task("d", TaskStatus::Done)],
                    is_collapsed: false,
                    created_at: T0,
                    updated_at: T0,
                },
            ],
            theme: Theme::Light,
            filter: StatusFilter::All,
        }
    }

    fn order(document: &Document, module_id: &str) -> Vec<String> {
        document
            .module(module_id)
            .unwrap()
            .tasks
            .iter()
            .map(|task| task.id.clone())
            .collect()
    }

    #[test]
    fn create_module_appends_empty_expanded_module() {
        let before = document();
        let now = T0 + Duration::minutes(5);

        let (after, module) = create_module(&before, &title("Rust Ownership"), now);

        assert_eq!(after.modules.len(), 3);
        assert_eq!(after.modules[2], module);
        assert_eq!(module.title, "Rust Ownership");
        assert!(module.tasks.is_empty());
        assert!(!module.is_collapsed);
        assert_eq!(module.created_at, now);
        assert_eq!(module.updated_at, now);
        assert_eq!(before.modules.len(), 2);
    }

    #[test]
    fn edit_module_touches_only_the_target() {
        let now = T0 + Duration::hours(1);
        let after = edit_module(&document(), "m-2", &title("TS Deep Dive"), now);

        assert_eq!(after.modules[1].title, "TS Deep Dive");
        assert_eq!(after.modules[1].updated_at, now);
        assert_eq!(after.modules[0], document().modules[0]);
    }

    #[test]
    fn delete_module_cascades_to_tasks() {
        let after = delete_module(&document(), "m-1");

        assert_eq!(after.modules.len(), 1);
        assert!(after.task("m-1", "a").is_none());
        assert_eq!(aggregate_progress(&after).total, 1);
    }

    #[test]
    fn deleting_the_only_module_leaves_zero_counts() {
        let single = delete_module(&document(), "m-2");
        let after = delete_module(&single, "m-1");

        assert!(after.modules.is_empty());
        let totals = aggregate_progress(&after);
        assert_eq!(totals.total, 0);
        assert_eq!(totals.completed, 0);
        assert_eq!(totals.ongoing, 0);
        assert_eq!(totals.upcoming, 0);
        assert_eq!(totals.percentage, 0);
    }

    #[test]
    fn toggle_collapse_flips_flag_twice() {
        let once = toggle_collapse(&document(), "m-1");
        assert!(once.modules[0].is_collapsed);

        let twice = toggle_collapse(&once, "m-1");
        assert!(!twice.modules[0].is_collapsed);
    }

    #[test]
    fn create_task_appends_upcoming_task() {
        let now = T0 + Duration::minutes(3);
        let (after, created) = create_task(&document(), "m-2", &title("Utility types"), now);

        let created = created.unwrap();
        assert_eq!(created.status, TaskStatus::Upcoming);
        assert_eq!(created.title, "Utility types");
        let module = after.module("m-2").unwrap();
        assert_eq!(module.tasks.last(), Some(&created));
        assert_eq!(module.updated_at, now);
    }

    #[test]
    fn create_task_in_unknown_module_is_noop() {
        let before = document();
        let (after, created) = create_task(&before, "missing", &title("x"), T0);

        assert!(created.is_none());
        assert_eq!(after, before);
    }

    #[test]
    fn edit_task_refreshes_task_and_module() {
        let now = T0 + Duration::days(1);
        let after = edit_task(&document(), "m-1", "b", &title("Props vs state"), now);

        let module = after.module("m-1").unwrap();
        let task = module.task("b").unwrap();
        assert_eq!(task.title, "Props vs state");
        assert_eq!(task.updated_at, now);
        assert_eq!(task.created_at, T0);
        assert_eq!(module.updated_at, now);
        assert_eq!(module.task("a").unwrap().updated_at, T0);
    }

    #[test]
    fn change_task_status_sets_status_and_timestamps() {
        let now = T0 + Duration::seconds(30);
        let after = change_task_status(&document(), "m-1", "c", TaskStatus::Done, now);

        let module = after.module("m-1").unwrap();
        assert_eq!(module.task("c").unwrap().status, TaskStatus::Done);
        assert_eq!(module.task("c").unwrap().updated_at, now);
        assert_eq!(module.updated_at, now);
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let earlier = T0 - Duration::hours(2);
        let after = change_task_status(&document(), "m-1", "a", TaskStatus::Ongoing, earlier);

        let module = after.module("m-1").unwrap();
        assert_eq!(module.task("a").unwrap().updated_at, T0);
        assert_eq!(module.updated_at, T0);
    }

    #[test]
    fn unknown_ids_leave_document_equal() {
        let before = document();
        let now = T0 + Duration::hours(3);

        assert_eq!(edit_module(&before, "nope", &title("x"), now), before);
        assert_eq!(delete_module(&before, "nope"), before);
        assert_eq!(toggle_collapse(&before, "nope"), before);
        assert_eq!(edit_task(&before, "m-1", "nope", &title("x"), now), before);
        assert_eq!(edit_task(&before, "nope", "a", &title("x"), now), before);
        assert_eq!(
            change_task_status(&before, "m-1", "nope", TaskStatus::Done, now),
            before
        );
        assert_eq!(reorder_task(&before, "nope", 0, 1, now), before);
        assert_eq!(delete_task(&before, "m-1", "nope", now), before);
        assert_eq!(delete_task(&before, "m-2", "a", now), before);
    }

    #[test]
    fn reorder_moves_task_to_target_index() {
        let now = T0 + Duration::minutes(1);
        let after = reorder_task(&document(), "m-1", 0, 2, now);

        assert_eq!(order(&after, "m-1"), vec!["b", "c", "a"]);
        assert_eq!(after.module("m-1").unwrap().updated_at, now);
    }

    #[test]
    fn reorder_then_reverse_restores_order() {
        let before = document();
        for from in 0..3 {
            for to in 0..3 {
                let moved = reorder_task(&before, "m-1", from, to, T0);
                let restored = reorder_task(&moved, "m-1", to, from, T0);
                assert_eq!(order(&restored, "m-1"), order(&before, "m-1"));
            }
        }
    }

    #[test]
    fn reorder_out_of_bounds_is_noop() {
        let before = document();
        let now = T0 + Duration::minutes(1);

        assert_eq!(reorder_task(&before, "m-1", 3, 0, now), before);
        assert_eq!(reorder_task(&before, "m-1", 0, 3, now), before);
        assert_eq!(reorder_task(&before, "m-2", 0, usize::MAX, now), before);
    }

    #[test]
    fn reorder_in_place_still_refreshes_module() {
        let now = T0 + Duration::minutes(10);
        let after = reorder_task(&document(), "m-1", 1, 1, now);

        assert_eq!(order(&after, "m-1"), vec!["a", "b", "c"]);
        assert_eq!(after.module("m-1").unwrap().updated_at, now);
    }

    #[test]
    fn delete_task_removes_only_that_task() {
        let now = T0 + Duration::minutes(2);
        let after = delete_task(&document(), "m-1", "b", now);

        assert_eq!(order(&after, "m-1"), vec!["a", "c"]);
        assert_eq!(after.module("m-1").unwrap().updated_at, now);
        assert_eq!(after.modules[1], document().modules[1]);
    }

    #[test]
    fn filter_and_theme_are_replaced() {
        let filtered = set_filter(&document(), StatusFilter::Ongoing);
        assert_eq!(filtered.filter, StatusFilter::Ongoing);
        assert_eq!(filtered.modules, document().modules);

        let dark = set_theme(&filtered, Theme::Dark);
        assert_eq!(dark.theme, Theme::Dark);
        assert_eq!(toggle_theme(&dark).theme, Theme::Light);
    }
}
