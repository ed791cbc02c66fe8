use super::{Module, Task, TaskStatus};
use crate::error::AppError;
use crate::ids;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// The complete persisted application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub modules: Vec<Module>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub filter: StatusFilter,
}

impl Document {
    pub fn empty(theme: Theme) -> Self {
        Self {
            modules: Vec::new(),
            theme,
            filter: StatusFilter::All,
        }
    }

    /// Sample learning plan shown on first launch.
    pub fn sample(theme: Theme, now: OffsetDateTime) -> Self {
        let react = sample_module(
            "React Fundamentals",
            &[
                ("Learn JSX syntax and components", TaskStatus::Done),
                ("Understand props and state", TaskStatus::Ongoing),
                ("Master React hooks", TaskStatus::Upcoming),
            ],
            now,
        );
        let typescript = sample_module(
            "TypeScript Essentials",
            &[
                ("Basic types and interfaces", TaskStatus::Done),
                ("Generics and advanced types", TaskStatus::Upcoming),
            ],
            now,
        );

        Self {
            modules: vec![react, typescript],
            theme,
            filter: StatusFilter::All,
        }
    }

    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.id == module_id)
    }

    pub fn task(&self, module_id: &str, task_id: &str) -> Option<&Task> {
        self.module(module_id).and_then(|module| module.task(task_id))
    }
}

fn sample_module(title: &str, tasks: &[(&str, TaskStatus)], now: OffsetDateTime) -> Module {
    let mut built: Vec<Task> = Vec::with_capacity(tasks.len());
    for (task_title, status) in tasks {
        let id = ids::unique_id(|candidate| built.iter().any(|task| task.id == candidate));
        built.push(Task {
            id,
            title: (*task_title).to_string(),
            status: *status,
            created_at: now,
            updated_at: now,
        });
    }

    Module {
        id: ids::new_id(),
        title: title.to_string(),
        tasks: built,
        is_collapsed: false,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Maps loose user spellings (`Dark-Mode`, `night`, `vanilla`) onto a theme.
    pub fn canonical(raw: &str) -> Option<Self> {
        let mut cleaned = String::new();
        let mut previous_underscore = false;

        for ch in raw.chars() {
            if ch.is_ascii_alphanumeric() {
                cleaned.push(ch.to_ascii_lowercase());
                previous_underscore = false;
            } else if !previous_underscore && !cleaned.is_empty() {
                cleaned.push('_');
                previous_underscore = true;
            }
        }

        match cleaned.trim_matches('_') {
            "" | "light" | "default" | "vanilla" | "light_mode" | "lightmode" => Some(Self::Light),
            "dark" | "dark_mode" | "darkmode" | "night" | "noir" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AppError;

    /// Strict parse for user input. Blank names are rejected here even though
    /// [`Theme::canonical`] treats them as the default.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if !raw.chars().any(|ch| ch.is_ascii_alphanumeric()) {
            return Err(AppError::invalid_input("theme is required"));
        }
        Self::canonical(raw).ok_or_else(|| {
            AppError::invalid_input(format!(
                "unknown theme `{}` (expected light or dark)",
                raw.trim()
            ))
        })
    }
}

/// The status used to narrow displayed tasks, or `All`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Upcoming,
    Ongoing,
    Done,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [Self::All, Self::Upcoming, Self::Ongoing, Self::Done];

    pub fn status(&self) -> Option<TaskStatus> {
        match self {
            Self::All => None,
            Self::Upcoming => Some(TaskStatus::Upcoming),
            Self::Ongoing => Some(TaskStatus::Ongoing),
            Self::Done => Some(TaskStatus::Done),
        }
    }

    pub fn matches(&self, status: TaskStatus) -> bool {
        self.status().is_none_or(|wanted| wanted == status)
    }

    pub fn as_str(&self) -> &'static str {
        match self.status() {
            Some(status) => status.as_str(),
            None => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self.status() {
            Some(status) => status.label(),
            None => "All",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.status() {
            Some(status) => status.icon(),
            None => "📚",
        }
    }
}

impl From<TaskStatus> for StatusFilter {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Upcoming => Self::Upcoming,
            TaskStatus::Ongoing => Self::Ongoing,
            TaskStatus::Done => Self::Done,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse::<TaskStatus>().map(Self::from).map_err(|_| {
            AppError::invalid_input(format!(
                "unknown filter `{trimmed}` (expected all, upcoming, ongoing or done)"
            ))
        })
    }
}
