use super::operation::ChangeKind;
use super::split::{HighlightRange, SplitKind, SplitLine, SplitView};
use super::stats::DiffStats;
use super::unified::{RowKind, UnifiedRow};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Renders projected views as terminal text
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffFormatter {
    color: bool,
}

impl DiffFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Format unified rows with old/new line-number gutters
    pub fn format_unified(&self, rows: &[UnifiedRow]) -> String {
        let mut output = Vec::new();

        for row in rows {
            match row {
                UnifiedRow::Line { old, new, kind, content } => {
                    let sign = match kind {
                        RowKind::Added => '+',
                        RowKind::Removed => '-',
                        RowKind::Unchanged | RowKind::Context => ' ',
                    };
                    let line = format!("{} {} {}{}", gutter(*old), gutter(*new), sign, content);
                    output.push(self.paint_row(line, *kind));
                }
                UnifiedRow::Run { segments, .. } => {
                    let mut line = String::new();
                    for segment in segments {
                        match segment.kind {
                            ChangeKind::Removed => line.push_str(&self.marked(&segment.content, "[-", "-]", RED)),
                            ChangeKind::Added => line.push_str(&self.marked(&segment.content, "{+", "+}", GREEN)),
                            ChangeKind::Unchanged => line.push_str(&segment.content),
                        }
                    }
                    output.push(line);
                }
            }
        }

        output.join("\n")
    }

    /// Format a split view as two columns separated by ` | `
    pub fn format_split(&self, view: &SplitView, width: usize) -> String {
        let half_width = width.saturating_sub(3) / 2;
        let mut output = Vec::new();

        for (left, right) in view.rows() {
            let left_text = side_text(left, "[-", "-]");
            let right_text = side_text(right, "{+", "+}");
            let left_lines: Vec<&str> = left_text.split('\n').collect();
            let right_lines: Vec<&str> = right_text.split('\n').collect();

            for idx in 0..left_lines.len().max(right_lines.len()) {
                let left_cell = cell(left, left_lines.get(idx).copied(), idx == 0);
                let right_cell = cell(right, right_lines.get(idx).copied(), idx == 0);

                let left_cell = pad(&truncate_line(&left_cell, half_width), half_width);
                let right_cell = truncate_line(&right_cell, half_width);

                output.push(format!(
                    "{} | {}",
                    self.paint_split(left_cell, left.kind),
                    self.paint_split(right_cell, right.kind)
                ));
            }
        }

        output.join("\n")
    }

    /// Format diff statistics as a summary
    pub fn format_stats(stats: &DiffStats) -> String {
        if !stats.has_changes() {
            return "No changes".to_string();
        }

        let mut parts = Vec::new();

        if stats.additions > 0 {
            parts.push(format!(
                "{} insertion{}",
                stats.additions,
                if stats.additions == 1 { "" } else { "s" }
            ));
        }

        if stats.deletions > 0 {
            parts.push(format!(
                "{} deletion{}",
                stats.deletions,
                if stats.deletions == 1 { "" } else { "s" }
            ));
        }

        parts.push(format!(
            "{} operation{}",
            stats.total,
            if stats.total == 1 { "" } else { "s" }
        ));

        parts.join(", ")
    }

    fn marked(&self, text: &str, open: &str, close: &str, color: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            format!("{}{}{}", open, text, close)
        }
    }

    fn paint_row(&self, line: String, kind: RowKind) -> String {
        match (self.color, kind) {
            (true, RowKind::Added) => format!("{}{}{}", GREEN, line, RESET),
            (true, RowKind::Removed) => format!("{}{}{}", RED, line, RESET),
            _ => line,
        }
    }

    fn paint_split(&self, cell: String, kind: SplitKind) -> String {
        match (self.color, kind) {
            (true, SplitKind::Added) => format!("{}{}{}", GREEN, cell, RESET),
            (true, SplitKind::Removed) => format!("{}{}{}", RED, cell, RESET),
            _ => cell,
        }
    }
}

fn gutter(number: Option<usize>) -> String {
    match number {
        Some(n) => format!("{:>4}", n),
        None => "    ".to_string(),
    }
}

fn cell(line: &SplitLine, text: Option<&str>, first: bool) -> String {
    match (line.kind, text) {
        (SplitKind::Empty, _) | (_, None) => String::new(),
        (_, Some(text)) => {
            let number = if first { line.line_number } else { None };
            format!("{} {}", gutter(number), text)
        }
    }
}

/// Content with highlight ranges wrapped in markers.
fn side_text(line: &SplitLine, open: &str, close: &str) -> String {
    let ranges: &[HighlightRange] = line.highlight_ranges.as_deref().unwrap_or(&[]);
    let mut text = String::with_capacity(line.content.len());
    let mut cursor = 0;

    for range in ranges {
        text.push_str(&line.content[cursor..range.start]);
        text.push_str(open);
        text.push_str(&line.content[range.start..range.end]);
        text.push_str(close);
        cursor = range.end;
    }
    text.push_str(&line.content[cursor..]);
    text
}

fn truncate_line(line: &str, max_width: usize) -> String {
    if line.chars().count() > max_width {
        if max_width > 3 {
            let kept: String = line.chars().take(max_width - 3).collect();
            format!("{}...", kept)
        } else {
            line.chars().take(max_width).collect()
        }
    } else {
        line.to_string()
    }
}

fn pad(line: &str, width: usize) -> String {
    let len = line.chars().count();
    if len < width {
        format!("{}{}", line, " ".repeat(width - len))
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::operation::{annotate, Operation};
    use crate::diff::split::project_split;
    use crate::diff::unified::project_unified;

    fn line_ops() -> Vec<Operation> {
        vec![
            Operation::unchanged("line1\n"),
            Operation::removed("line2\n"),
            Operation::added("modified\n"),
            Operation::unchanged("line3"),
        ]
    }

    #[test]
    fn test_format_unified() {
        let rows = project_unified(&annotate(&line_ops()), true);
        let formatted = DiffFormatter::new(false).format_unified(&rows);

        assert!(formatted.contains("   2      -line2"));
        assert!(formatted.contains("        2 +modified"));
        assert!(formatted.contains("   3    3  line3"));
    }

    #[test]
    fn test_format_unified_run() {
        let ops = vec![
            Operation::unchanged("The "),
            Operation::removed("quick"),
            Operation::added("fast"),
            Operation::unchanged(" fox"),
        ];
        let rows = project_unified(&annotate(&ops), false);
        let formatted = DiffFormatter::new(false).format_unified(&rows);

        assert_eq!(formatted, "The [-quick-]{+fast+} fox");
    }

    #[test]
    fn test_format_split() {
        let view = project_split(&annotate(&line_ops()), true);
        let formatted = DiffFormatter::new(false).format_split(&view, 43);
        let lines: Vec<&str> = formatted.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("   2 line2"));
        assert!(lines[1].ends_with(" | "));
        assert!(lines[2].ends_with("|    2 modified"));
    }

    #[test]
    fn test_format_split_highlights() {
        let ops = vec![
            Operation::unchanged("a "),
            Operation::removed("b"),
            Operation::added("c"),
        ];
        let view = project_split(&annotate(&ops), false);
        let formatted = DiffFormatter::new(false).format_split(&view, 43);

        assert!(formatted.contains("a [-b-]"));
        assert!(formatted.contains("a {+c+}"));
    }

    #[test]
    fn test_format_stats() {
        let stats = DiffStats::from_operations(&line_ops());
        let summary = DiffFormatter::format_stats(&stats);

        assert_eq!(summary, "1 insertion, 1 deletion, 4 operations");
        assert_eq!(DiffFormatter::format_stats(&DiffStats::default()), "No changes");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_line("ééééééé", 5), "éé...");
        assert_eq!(truncate_line("short", 10), "short");
    }
}
