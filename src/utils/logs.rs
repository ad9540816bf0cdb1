use console::{measure_text_width, Style};
use rust_decimal::Decimal;

use crate::notice::{Notice, Severity};
use crate::weightings::{CourseCriterion, CriterionWeighting, WeightingView};

pub const TREE_BRANCH: char = '\u{251C}';
pub const TREE_END: char = '\u{2514}';
pub const TREE_HORIZ: char = '\u{2500}';
pub const TREE_VERT: char = '\u{2502}';

const TREE_PREFIX_WIDTH: usize = 4;
const VALUE_COLUMN: usize = 32;
const BAR_WIDTH: usize = 20;

fn tree_branch() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_BRANCH, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_end() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_END, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_indent() -> String {
    dim().apply_to(format!("{}   ", TREE_VERT)).to_string()
}

fn tree_blank() -> String {
    " ".repeat(TREE_PREFIX_WIDTH)
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn init_prefix() -> String {
    blue().apply_to("[INIT]").to_string()
}

fn load_prefix() -> String {
    magenta().apply_to("[LOAD]").to_string()
}

pub fn pad_label(label: &str, depth: usize) -> String {
    let prefix_width = depth * TREE_PREFIX_WIDTH;
    let target_width = VALUE_COLUMN.saturating_sub(prefix_width);
    let current_width = measure_text_width(label);
    if current_width < target_width {
        format!("{}{}", label, " ".repeat(target_width - current_width))
    } else {
        format!("{} ", label)
    }
}

pub fn format_points(value: Decimal) -> String {
    value.normalize().to_string()
}

fn progress_bar(progress: f64) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    let style = if progress > 100.0 {
        red()
    } else if progress >= 100.0 {
        green()
    } else {
        cyan()
    };
    format!(
        "{}{} {}",
        style.apply_to("\u{2588}".repeat(filled)),
        dim().apply_to("\u{2591}".repeat(BAR_WIDTH - filled)),
        dim().apply_to(format!("{progress:.0}%"))
    )
}

pub fn log_init(base_url: &str, course: i64) {
    println!(
        "{} weightings for course {} via {}",
        init_prefix(),
        bold().apply_to(course),
        cyan().apply_to(base_url),
    );
}

pub fn log_loading(course: i64) {
    println!("{} fetching criteria for course {}...", load_prefix(), course);
}

pub fn log_notice(notice: &Notice) {
    let style = match notice.severity {
        Severity::Success => green(),
        Severity::Error => red(),
    };
    let prefix = format!("[{}]", notice.severity.to_string().to_uppercase());
    println!("{} {}", style.apply_to(prefix), notice.message);
}

fn item_lines(lines: &mut Vec<String>, stem: &str, items: &[CourseCriterion], bonus: bool) {
    let count = items.len();
    for (i, item) in items.iter().enumerate() {
        let branch = if i == count - 1 {
            tree_end()
        } else {
            tree_branch()
        };
        let points = format_points(item.percentage);
        let value = if bonus {
            yellow().apply_to(format!("+{points}")).to_string()
        } else {
            points
        };
        lines.push(format!(
            "{}{}{} {} {}",
            stem,
            branch,
            pad_label(&item.name, 2),
            value,
            dim().apply_to(format!("#{}", item.id))
        ));
    }
}

fn criterion_lines(lines: &mut Vec<String>, weighting: &CriterionWeighting) {
    let c = &weighting.criterion;
    lines.push(format!(
        "{} {}",
        bold().apply_to(&c.name),
        dim().apply_to(format!("#{}", c.id))
    ));

    lines.push(format!(
        "{}{} {}/{}",
        tree_branch(),
        pad_label("points", 1),
        bold().apply_to(format_points(weighting.total)),
        format_points(c.weight)
    ));
    lines.push(format!(
        "{}{} {}",
        tree_branch(),
        pad_label("progress", 1),
        progress_bar(weighting.progress)
    ));

    let remaining_style = if weighting.remaining < Decimal::ZERO {
        red()
    } else {
        dim()
    };
    lines.push(format!(
        "{}{} {}",
        tree_branch(),
        pad_label("remaining", 1),
        remaining_style.apply_to(format_points(weighting.remaining))
    ));

    lines.push(format!("{}{}", tree_branch(), pad_label("sub-criteria", 1)));
    if weighting.sub_criteria.is_empty() {
        lines.push(format!("{}{}{}", tree_indent(), tree_end(), dim().apply_to("none")));
    } else {
        item_lines(lines, &tree_indent(), &weighting.sub_criteria, false);
    }

    lines.push(format!(
        "{}{} {}",
        tree_end(),
        pad_label("extra points", 1),
        yellow().apply_to(format!("+{}", format_points(weighting.special_total)))
    ));
    if weighting.special_criteria.is_empty() {
        lines.push(format!("{}{}{}", tree_blank(), tree_end(), dim().apply_to("none")));
    } else {
        item_lines(lines, &tree_blank(), &weighting.special_criteria, true);
    }
}

pub fn render_view(view: &WeightingView) -> Vec<String> {
    let mut lines = vec![format!(
        "{} course {}",
        magenta().apply_to(bold().apply_to("[WEIGHTINGS]")),
        bold().apply_to(view.course)
    )];

    if view.criteria.is_empty() {
        lines.push(format!(
            "{}{}",
            tree_end(),
            dim().apply_to("no criteria in this course's evaluation template")
        ));
    }

    for weighting in &view.criteria {
        lines.push(String::new());
        criterion_lines(&mut lines, weighting);
    }

    if !view.unassigned.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", yellow().apply_to("UNASSIGNED")));
        let count = view.unassigned.len();
        for (i, (kind, item)) in view.unassigned.iter().enumerate() {
            let branch = if i == count - 1 {
                tree_end()
            } else {
                tree_branch()
            };
            lines.push(format!(
                "{}{} {} {}",
                branch,
                pad_label(&item.name, 1),
                format_points(item.percentage),
                dim().apply_to(format!("({kind} of missing criterion #{})", item.parent_criterion))
            ));
        }
    }

    lines
}

pub fn print_view(view: &WeightingView) {
    for line in render_view(view) {
        println!("{line}");
    }
}
