use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dominator",
    author,
    version,
    about = "Track learning modules and the progress of their tasks",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, rename, collapse or delete learning modules
    Module {
        #[command(subcommand)]
        action: ModuleCommand,
    },
    /// Add, edit, move or delete tasks inside a module
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Show only tasks with a given status
    ///
    /// Example: dominator filter ongoing
    /// Example: dominator filter all
    Filter { filter: String },
    /// Switch between light and dark, or toggle when no theme is given
    ///
    /// Example: dominator theme dark
    Theme { theme: Option<String> },
    /// List modules with their progress and filtered tasks
    List,
    /// Show overall statistics
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommand {
    /// Add a new module
    ///
    /// Example: dominator module add "React Fundamentals"
    Add { title: Option<String> },
    /// Rename a module
    ///
    /// Example: dominator module edit lq2x8k3a9f1c2d3e "React Deep Dive"
    Edit { id: String, title: Option<String> },
    /// Delete a module and all of its tasks
    ///
    /// Example: dominator module delete lq2x8k3a9f1c2d3e --yes
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Collapse or expand a module in listings
    Toggle { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task to a module
    ///
    /// Example: dominator task add <module-id> "Master React hooks"
    Add {
        module_id: String,
        title: Option<String>,
    },
    /// Rename a task
    Edit {
        module_id: String,
        task_id: String,
        title: Option<String>,
    },
    /// Set a task's status (upcoming, ongoing, done)
    ///
    /// Example: dominator task status <module-id> <task-id> ongoing
    Status {
        module_id: String,
        task_id: String,
        status: String,
    },
    /// Move a task to another position within its module
    ///
    /// Positions are zero-based, as shown by `dominator list`.
    /// Example: dominator task move <module-id> 0 2
    Move {
        module_id: String,
        from: usize,
        to: usize,
    },
    /// Delete a task
    Delete {
        module_id: String,
        task_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    SampleData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "sample_data" | "samples" => ConfigOverrideTarget::SampleData,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
