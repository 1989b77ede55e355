//! Text rendering of resolved navigation trees.

use colored::Colorize;
use navtree::{ItemContainer, NavigationTree, Resolution, ResolvedItem};

/// Render every item of the pass, one line per item, children indented.
///
/// Selected items are marked with `*`, others with `-`.
pub fn render_tree(pass: &Resolution<'_>) -> String {
    let mut out = String::new();
    render_items(&pass.root_items(), &mut out);
    out
}

fn render_items(items: &[ResolvedItem<'_, '_>], out: &mut String) {
    for item in items {
        let indent = "  ".repeat(item.level().saturating_sub(1));
        let options = item
            .render_options()
            .iter()
            .map(|(k, v)| format!("{k}={v:?}"))
            .collect::<Vec<_>>()
            .join(" ");

        let line = format!("{} {} [{}] {}", marker(item), item.name(), item.key(), item.url());
        let line = if item.selected() {
            line.green().bold().to_string()
        } else {
            line
        };

        out.push_str(&indent);
        out.push_str(&line);
        if let Some(method) = item.method() {
            out.push_str(&format!(" ({method})"));
        }
        if !options.is_empty() {
            out.push_str(&format!("  {{{options}}}"));
        }
        out.push('\n');

        if let Some(children) = item.sub_navigation() {
            render_items(&children, out);
        }
    }
}

fn marker(item: &ResolvedItem<'_, '_>) -> &'static str {
    if item.selected() { "*" } else { "-" }
}

/// Render the active path as a breadcrumb line, or a placeholder.
pub fn render_active_path(pass: &Resolution<'_>) -> String {
    let snapshot = pass.snapshot();
    if snapshot.is_empty() {
        return "(no active item)".dimmed().to_string();
    }
    snapshot.names().join(" > ")
}

/// Number of items on each level, root first.
pub fn level_counts(tree: &NavigationTree) -> Vec<usize> {
    let mut counts = Vec::new();
    count_container(tree.root(), &mut counts);
    counts
}

fn count_container(container: &ItemContainer, counts: &mut Vec<usize>) {
    if container.is_empty() {
        return;
    }
    let idx = container.level() - 1;
    if counts.len() <= idx {
        counts.resize(idx + 1, 0);
    }
    counts[idx] += container.len();
    for item in container.items() {
        if let Some(sub) = item.sub_navigation() {
            count_container(sub, counts);
        }
    }
}
