use colored::Colorize;
use itertools::Itertools;

use crate::ops::{AliasEntry, Report};
use crate::repo::RunOptions;

/// Aligned `name -> command [tags]` lines followed by a count
pub fn format_alias_listing(entries: &[AliasEntry]) -> String {
    if entries.is_empty() {
        return "No aliases found.\n\ncount: 0".to_string();
    }

    let max_name_width = entries.iter().map(|entry| entry.name.chars().count()).max().unwrap_or(0);

    let output = entries
        .iter()
        .map(|entry| {
            let mut line = format!("{:>width$} -> {}", entry.name, entry.command, width = max_name_width);
            if !entry.tags.is_empty() {
                let tags = entry.tags.iter().map(|tag| format!("#{}", tag)).join(" ");
                line.push_str(&format!("  {}", tags.cyan()));
            }
            line
        })
        .join("\n");

    format!("{}\n\ncount: {}", output, entries.len())
}

/// Tags of one alias on a single line
pub fn format_tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        "(none)".to_string()
    } else {
        tags.join(", ")
    }
}

/// `tag (n)` lines, one per tag
pub fn format_tag_counts(counts: &[(String, usize)]) -> String {
    if counts.is_empty() {
        return "No tags defined.".to_string();
    }
    counts.iter().map(|(tag, count)| format!("{} ({})", tag, count)).join("\n")
}

/// Notices, then in a dry run the preview of every planned effect
pub fn format_report<T>(report: &Report<T>, opts: RunOptions) -> String {
    let mut lines: Vec<String> = report
        .notices
        .iter()
        .map(|notice| format!("{} {}", "Notice:".yellow(), notice))
        .collect();
    if opts.dry_run {
        if report.effects.is_empty() {
            lines.push("[dry-run] nothing to do".to_string());
        }
        lines.extend(report.effects.iter().map(|effect| format!("[dry-run] would {}", effect.preview())));
    }
    lines.join("\n")
}
