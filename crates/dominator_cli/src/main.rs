use clap::{CommandFactory, Parser};
use dominator_cli::cli::{
    Cli, Command, ConfigOverrideTarget, ModuleCommand, TaskCommand, parse_config_override,
};
use dominator_cli::render;
use dominator_core::config::{self, ConfigOverrides, palette_for_theme};
use dominator_core::error::AppError;
use dominator_core::logging;
use dominator_core::model::{Document, Theme};
use dominator_core::tracker_api::{self, Store};
use dominator_core::view::document_view;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

const LOG_LEVEL_ENV_VAR: &str = "DOMINATOR_LOG_LEVEL";
const LOG_DIR_ENV_VAR: &str = "DOMINATOR_LOG_DIR";
const DEFAULT_LOG_LEVEL: &str = "warn";

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered =
        serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn print_nothing_changed(cli_json: bool, what: &str, id: &str) -> Result<(), AppError> {
    if cli_json {
        print_json(&serde_json::Value::Null)
    } else {
        println!("No {what} with id {}; nothing changed", id.trim());
        Ok(())
    }
}

fn print_cancelled(cli_json: bool) -> Result<(), AppError> {
    if cli_json {
        print_json(&serde_json::Value::Null)
    } else {
        println!("Cancelled");
        Ok(())
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

// Prompts go to stderr so `--json` stdout stays parseable.
fn confirm(prompt: &str) -> Result<bool, AppError> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn parse_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => {
                let theme: Theme = parsed.value.parse()?;
                overrides.theme = Some(theme.as_str().to_string());
            }
            ConfigOverrideTarget::SampleData => {
                let flag = parsed.value.parse::<bool>().map_err(|_| {
                    AppError::invalid_input("sample_data must be true or false")
                })?;
                overrides.sample_data = Some(flag);
            }
        }
    }
    Ok(overrides)
}

struct Session {
    store: Store,
    palette_theme: Option<Theme>,
}

impl Session {
    fn open(raw_overrides: &[String]) -> Result<Self, AppError> {
        let overrides = parse_overrides(raw_overrides)?;
        let store = Store::from_env()?;
        let merged = config::merge_overrides(store.config(), &overrides);
        Ok(Self {
            store: store.with_config(merged),
            palette_theme: overrides.theme.as_deref().and_then(Theme::canonical),
        })
    }

    fn palette_theme(&self, document: &Document) -> Theme {
        self.palette_theme.unwrap_or(document.theme)
    }
}

fn run_module_command(session: &Session, json: bool, action: ModuleCommand) -> Result<(), AppError> {
    let store = &session.store;
    match action {
        ModuleCommand::Add { title } => {
            let module = tracker_api::create_module(store, title.as_deref().unwrap_or_default())?;
            if json {
                print_json(&module)?;
            } else {
                println!("Added module: {} ({})", module.title, module.id);
            }
        }
        ModuleCommand::Edit { id, title } => {
            let document =
                tracker_api::edit_module(store, &id, title.as_deref().unwrap_or_default())?;
            let Some(module) = document.module(id.trim()) else {
                return print_nothing_changed(json, "module", &id);
            };
            if json {
                print_json(module)?;
            } else {
                println!("Updated module: {} ({})", module.title, module.id);
            }
        }
        ModuleCommand::Delete { id, yes } => {
            let document = tracker_api::open(store)?;
            let Some(module) = document.module(id.trim()) else {
                return print_nothing_changed(json, "module", &id);
            };
            let prompt = format!(
                "Delete module '{}' and all of its {} tasks?",
                module.title,
                module.tasks.len()
            );
            if !yes && !confirm(&prompt)? {
                return print_cancelled(json);
            }

            tracker_api::delete_module(store, &module.id)?;
            if json {
                print_json(module)?;
            } else {
                println!("Deleted module: {} ({})", module.title, module.id);
            }
        }
        ModuleCommand::Toggle { id } => {
            let document = tracker_api::toggle_collapse(store, &id)?;
            let Some(module) = document.module(id.trim()) else {
                return print_nothing_changed(json, "module", &id);
            };
            if json {
                print_json(module)?;
            } else if module.is_collapsed {
                println!("Collapsed module: {} ({})", module.title, module.id);
            } else {
                println!("Expanded module: {} ({})", module.title, module.id);
            }
        }
    }
    Ok(())
}

fn run_task_command(session: &Session, json: bool, action: TaskCommand) -> Result<(), AppError> {
    let store = &session.store;
    match action {
        TaskCommand::Add { module_id, title } => {
            let created =
                tracker_api::create_task(store, &module_id, title.as_deref().unwrap_or_default())?;
            let Some(task) = created else {
                return print_nothing_changed(json, "module", &module_id);
            };
            if json {
                print_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        TaskCommand::Edit {
            module_id,
            task_id,
            title,
        } => {
            let document = tracker_api::edit_task(
                store,
                &module_id,
                &task_id,
                title.as_deref().unwrap_or_default(),
            )?;
            let Some(task) = document.task(module_id.trim(), task_id.trim()) else {
                return print_nothing_changed(json, "task", &task_id);
            };
            if json {
                print_json(task)?;
            } else {
                println!("Updated task: {} ({})", task.title, task.id);
            }
        }
        TaskCommand::Status {
            module_id,
            task_id,
            status,
        } => {
            let document = tracker_api::change_task_status(store, &module_id, &task_id, &status)?;
            let Some(task) = document.task(module_id.trim(), task_id.trim()) else {
                return print_nothing_changed(json, "task", &task_id);
            };
            if json {
                print_json(task)?;
            } else {
                println!(
                    "Marked task: {} ({}) as {} {}",
                    task.title,
                    task.id,
                    task.status.icon(),
                    task.status
                );
            }
        }
        TaskCommand::Move {
            module_id,
            from,
            to,
        } => {
            let document = tracker_api::reorder_task(store, &module_id, from, to)?;
            let Some(module) = document.module(module_id.trim()) else {
                return print_nothing_changed(json, "module", &module_id);
            };
            if json {
                return print_json(&module.tasks);
            }
            match module.tasks.get(to) {
                Some(task) if from < module.tasks.len() => {
                    println!("Moved task: {} ({}) from {} to {}", task.title, task.id, from, to);
                }
                _ => println!(
                    "Position out of range (module has {} tasks); nothing changed",
                    module.tasks.len()
                ),
            }
        }
        TaskCommand::Delete {
            module_id,
            task_id,
            yes,
        } => {
            let document = tracker_api::open(store)?;
            let Some(task) = document.task(module_id.trim(), task_id.trim()) else {
                return print_nothing_changed(json, "task", &task_id);
            };
            if !yes && !confirm(&format!("Delete task '{}'?", task.title))? {
                return print_cancelled(json);
            }

            tracker_api::delete_task(store, &module_id, &task.id)?;
            if json {
                print_json(task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
    }
    Ok(())
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let session = Session::open(&cli.config_override)?;
    let store = &session.store;

    match cli.command {
        Command::Module { action } => run_module_command(&session, cli.json, action)?,
        Command::Task { action } => run_task_command(&session, cli.json, action)?,
        Command::Filter { filter } => {
            let document = tracker_api::set_filter(store, &filter)?;
            if cli.json {
                print_json(&document_view(&document))?;
            } else {
                println!(
                    "Filter set to: {} {}",
                    document.filter.icon(),
                    document.filter.label()
                );
            }
        }
        Command::Theme { theme } => {
            let document = match theme {
                Some(name) => tracker_api::set_theme(store, &name)?,
                None => tracker_api::toggle_theme(store)?,
            };
            if cli.json {
                print_json(&serde_json::json!({ "theme": document.theme }))?;
            } else {
                println!("Theme set to: {}", document.theme);
            }
        }
        Command::List => {
            if cli.json {
                print_json(&tracker_api::view(store)?)?;
            } else {
                let document = tracker_api::open(store)?;
                let palette = palette_for_theme(session.palette_theme(&document));
                println!("{}", render::document_text(&document, &palette));
            }
        }
        Command::Stats => {
            if cli.json {
                let view = tracker_api::view(store)?;
                let modules: Vec<_> = view
                    .modules
                    .iter()
                    .map(|module| {
                        serde_json::json!({
                            "id": module.id,
                            "title": module.title,
                            "progress": module.progress,
                        })
                    })
                    .collect();
                print_json(&serde_json::json!({
                    "totals": view.totals,
                    "modules": modules,
                }))?;
            } else {
                println!("{}", render::stats_text(&tracker_api::open(store)?));
            }
        }
    }

    Ok(())
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();

    loop {
        input.clear();
        // Re-acquire stdin per line so confirmation prompts can read from it.
        let bytes = io::stdin().read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("dominator".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn init_logging_from_env() {
    let level = std::env::var(LOG_LEVEL_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_dir = std::env::var_os(LOG_DIR_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    if let Err(err) = logging::init_logging(&level, log_dir.as_deref()) {
        eprintln!("WARN: logging disabled: {}", err);
    }
}

fn main() {
    init_logging_from_env();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                err.exit();
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
