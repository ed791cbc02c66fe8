use crate::model::{StatusFilter, Task};

/// Tasks matching `filter`, in their original relative order.
pub fn filter_by_status(tasks: &[Task], filter: StatusFilter) -> Vec<Task> {
    match filter.status() {
        None => tasks.to_vec(),
        Some(status) => tasks
            .iter()
            .filter(|task| task.status == status)
            .cloned()
            .collect(),
    }
}
