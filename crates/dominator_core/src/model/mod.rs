mod document;
mod module;
mod task;
mod title;

pub use document::{Document, StatusFilter, Theme};
pub use module::Module;
pub use task::{Task, TaskStatus};
pub use title::Title;

use time::OffsetDateTime;

/// Next `updated_at` value; never moves backwards when the clock does.
pub(crate) fn refreshed(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    previous.max(now)
}
