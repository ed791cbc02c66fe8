use dominator_core::config::Palette;
use dominator_core::model::{Document, Module, StatusFilter, Task};
use dominator_core::progress::{Progress, aggregate_progress, compute_progress};
use dominator_core::view::module_view;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const BAR_WIDTH: usize = 20;

pub fn progress_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn task_line(position: usize, task: &Task, palette: &Palette) -> String {
    format!(
        "  {position}. {} {} {}",
        task.status.icon(),
        task.title,
        palette.mutedize(&format!("[{}] ({})", task.status.label(), task.id))
    )
}

fn empty_module_message(filter: StatusFilter) -> String {
    match filter {
        StatusFilter::All => "  No tasks yet.".to_string(),
        other => format!("  No {} tasks found.", other.as_str()),
    }
}

fn module_block(module: &Module, filter: StatusFilter, palette: &Palette) -> Vec<String> {
    let view = module_view(module, filter);
    let progress = view.progress;
    let mut lines = vec![
        format!(
            "{} {}",
            palette.accentize(&module.title),
            palette.mutedize(&format!("({})", module.id))
        ),
        format!(
            "  {} {}/{} tasks completed, {}%",
            progress_bar(progress.percentage),
            progress.completed,
            progress.total,
            progress.percentage
        ),
        format!(
            "  ⏳ {}  🔄 {}  ✅ {}",
            progress.upcoming, progress.ongoing, progress.completed
        ),
    ];

    if module.is_collapsed {
        lines.push(palette.mutedize("  (collapsed)"));
        return lines;
    }

    if view.tasks.is_empty() {
        lines.push(empty_module_message(filter));
        return lines;
    }

    // Positions refer to the unfiltered list so they can be fed to `task move`.
    for task in &view.tasks {
        let position = module.task_position(&task.id).unwrap_or_default();
        lines.push(task_line(position, task, palette));
    }
    lines
}

/// One tab per filter with the number of tasks it would show; the active one
/// is bracketed.
pub fn filter_tabs(document: &Document, palette: &Palette) -> String {
    let totals = aggregate_progress(document);
    StatusFilter::ALL
        .iter()
        .map(|filter| {
            let count = match filter {
                StatusFilter::All => totals.total,
                StatusFilter::Upcoming => totals.upcoming,
                StatusFilter::Ongoing => totals.ongoing,
                StatusFilter::Done => totals.completed,
            };
            let tab = format!("{} {} {}", filter.icon(), filter.label(), count);
            if *filter == document.filter {
                palette.accentize(&format!("[{tab}]"))
            } else {
                tab
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn document_text(document: &Document, palette: &Palette) -> String {
    let mut lines = vec![
        format!(
            "{} Filter: {} | Theme: {}",
            document.filter.icon(),
            document.filter.label(),
            document.theme
        ),
        filter_tabs(document, palette),
    ];

    if document.modules.is_empty() {
        lines.push(String::new());
        lines.push("No learning modules yet.".to_string());
        lines.push("Create one with: dominator module add \"<title>\"".to_string());
        return lines.join("\n");
    }

    for module in &document.modules {
        lines.push(String::new());
        lines.extend(module_block(module, document.filter, palette));
    }
    lines.join("\n")
}

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "Module")]
    title: String,
    #[tabled(rename = "Done")]
    completed: usize,
    #[tabled(rename = "Ongoing")]
    ongoing: usize,
    #[tabled(rename = "Upcoming")]
    upcoming: usize,
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "Progress")]
    percentage: String,
}

impl ModuleRow {
    fn new(module: &Module) -> Self {
        let Progress {
            total,
            completed,
            ongoing,
            upcoming,
            percentage,
        } = compute_progress(module);
        Self {
            title: module.title.clone(),
            completed,
            ongoing,
            upcoming,
            total,
            percentage: format!("{percentage}%"),
        }
    }
}

pub fn stats_text(document: &Document) -> String {
    let totals = aggregate_progress(document);
    let mut out = format!(
        "Total tasks: {} (across {} modules)\nCompleted: {} ({}% of total)\nIn progress: {}\nUpcoming: {}",
        totals.total,
        document.modules.len(),
        totals.completed,
        totals.percentage,
        totals.ongoing,
        totals.upcoming
    );

    if !document.modules.is_empty() {
        let rows: Vec<ModuleRow> = document.modules.iter().map(ModuleRow::new).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str("\n\n");
        out.push_str(&table.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{document_text, filter_tabs, progress_bar, stats_text};
    use dominator_core::config::palette_for_theme;
    use dominator_core::model::{Document, StatusFilter, TaskStatus, Theme};
    use dominator_core::mutation;
    use std::time::SystemTime;

    fn sample() -> Document {
        let now = SystemTime::UNIX_EPOCH.into();
        Document::sample(Theme::Light, now)
    }

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(33), format!("[{}{}]", "#".repeat(6), "-".repeat(14)));
    }

    #[test]
    fn document_text_lists_modules_and_tasks() {
        let text = document_text(&sample(), &palette_for_theme(Theme::Light));

        assert!(text.contains("Filter: All"));
        assert!(text.contains("React Fundamentals"));
        assert!(text.contains("1/3 tasks completed, 33%"));
        assert!(text.contains("0. ✅ Learn JSX syntax and components [Done]"));
        assert!(text.contains("TypeScript Essentials"));
    }

    #[test]
    fn filtered_listing_keeps_original_positions() {
        let document = mutation::set_filter(&sample(), StatusFilter::Upcoming);
        let text = document_text(&document, &palette_for_theme(Theme::Light));

        assert!(text.contains("2. ⏳ Master React hooks"));
        assert!(!text.contains("Learn JSX syntax"));
    }

    #[test]
    fn header_counts_tasks_for_every_filter() {
        let palette = palette_for_theme(Theme::Light);
        let document = sample();

        let tabs = filter_tabs(&document, &palette);
        assert_eq!(
            tabs,
            "[📚 All 5] | ⏳ Upcoming 2 | 🔄 Ongoing 1 | ✅ Done 2"
        );

        let ongoing = mutation::set_filter(&document, StatusFilter::Ongoing);
        let text = document_text(&ongoing, &palette);
        assert!(text.contains("📚 All 5 | ⏳ Upcoming 2 | [🔄 Ongoing 1] | ✅ Done 2"));
    }

    #[test]
    fn collapsed_module_hides_tasks() {
        let document = sample();
        let id = document.modules[0].id.clone();
        let collapsed = mutation::toggle_collapse(&document, &id);

        let text = document_text(&collapsed, &palette_for_theme(Theme::Light));

        assert!(text.contains("(collapsed)"));
        assert!(!text.contains("Master React hooks"));
    }

    #[test]
    fn empty_filter_result_explains_itself() {
        let mut document = sample();
        for task in &mut document.modules[1].tasks {
            task.status = TaskStatus::Upcoming;
        }
        let document = mutation::set_filter(&document, StatusFilter::Done);

        let text = document_text(&document, &palette_for_theme(Theme::Light));
        assert!(text.contains("No done tasks found."));
    }

    #[test]
    fn empty_document_suggests_creating_a_module() {
        let text = document_text(&Document::empty(Theme::Light), &palette_for_theme(Theme::Light));
        assert!(text.contains("No learning modules yet."));
    }

    #[test]
    fn stats_summarize_all_modules() {
        let text = stats_text(&sample());

        assert!(text.contains("Total tasks: 5 (across 2 modules)"));
        assert!(text.contains("Completed: 2 (40% of total)"));
        assert!(text.contains("In progress: 1"));
        assert!(text.contains("Upcoming: 2"));
        assert!(text.contains("Module"));
        assert!(text.contains("33%"));
        assert!(text.contains("50%"));
    }
}
