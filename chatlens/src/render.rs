//! Report rendering for terminal and Markdown output.

use chatlens_core::format::{format_score, SHORT_NAME_LEN};
use chatlens_core::ActivityReport;
use std::fmt::{self, Write};

/// Width of a matrix column: short name plus ellipsis and a gap
const COLUMN_WIDTH: usize = SHORT_NAME_LEN + 4;

/// Plain-text report, one section per analysis stage.
pub fn render_terminal(report: &ActivityReport, top: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_terminal(&mut out, report, top)?;
    Ok(out)
}

/// Markdown report with contributor table, trigger list and matrix.
pub fn render_markdown(report: &ActivityReport, top: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_markdown(&mut out, report, top)?;
    Ok(out)
}

fn write_terminal(out: &mut impl Write, report: &ActivityReport, top: usize) -> fmt::Result {
    if report.contributors.is_empty() {
        return writeln!(out, "No messages found.");
    }

    if let Some(cutoff) = report.amnesty_cutoff {
        writeln!(out, "Amnesty: history up to {} forgiven", cutoff)?;
        writeln!(out)?;
    }

    for contributor in report.top(top) {
        writeln!(
            out,
            "Contributor {} has contributed {} messages with {} words.",
            contributor.name, contributor.message_count, contributor.word_count
        )?;
    }
    writeln!(out)?;

    writeln!(out, "TRIGGERS")?;
    if report.triggers.is_empty() {
        writeln!(out, "   (no contributor has a unique trigger)")?;
    }
    for link in &report.triggers {
        writeln!(
            out,
            "   {} is most triggered by {}",
            link.triggered, link.triggered_by
        )?;
    }
    writeln!(out)?;

    writeln!(out, "CORRELATION")?;
    let shown = top.min(report.matrix.len());
    write!(out, "{:width$}", "", width = COLUMN_WIDTH)?;
    for label in &report.matrix.short_names[..shown] {
        write!(out, "{:>width$}", label, width = COLUMN_WIDTH)?;
    }
    writeln!(out)?;
    for (row, label) in report.matrix.short_names[..shown].iter().enumerate() {
        write!(out, "{:width$}", label, width = COLUMN_WIDTH)?;
        for column in 0..shown {
            let score = report.matrix.get(row, column).unwrap_or(0.0);
            write!(out, "{:>width$}", format_score(score), width = COLUMN_WIDTH)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_markdown(out: &mut impl Write, report: &ActivityReport, top: usize) -> fmt::Result {
    writeln!(out, "# Chat Activity Report")?;
    writeln!(out)?;
    if let Some(cutoff) = report.amnesty_cutoff {
        writeln!(out, "_Amnesty: history up to {} forgiven._", cutoff)?;
        writeln!(out)?;
    }

    writeln!(out, "## Contributors")?;
    writeln!(out)?;
    writeln!(
        out,
        "| # | Name | Messages | Words | Characters | First active | Last active |"
    )?;
    writeln!(out, "|---|------|---------:|------:|-----------:|--------------|-------------|")?;
    for (i, c) in report.top(top).iter().enumerate() {
        let first = c
            .timeline
            .first_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let last = c
            .timeline
            .last_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            i + 1,
            escape_cell(&c.name),
            c.message_count,
            c.word_count,
            c.char_count,
            first,
            last
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Triggers")?;
    writeln!(out)?;
    if report.triggers.is_empty() {
        writeln!(out, "No contributor has a unique trigger.")?;
    }
    for link in &report.triggers {
        writeln!(
            out,
            "- **{}** is most triggered by **{}**",
            link.triggered, link.triggered_by
        )?;
    }
    writeln!(out)?;

    let shown = top.min(report.matrix.len());
    if shown > 0 {
        let labels = &report.matrix.short_names[..shown];
        writeln!(out, "## Correlation Matrix")?;
        writeln!(out)?;
        write!(out, "| |")?;
        for label in labels {
            write!(out, " {} |", escape_cell(label))?;
        }
        writeln!(out)?;
        writeln!(out, "|---|{}", "---:|".repeat(shown))?;
        for (row, label) in labels.iter().enumerate() {
            write!(out, "| **{}** |", escape_cell(label))?;
            for column in 0..shown {
                let score = report.matrix.get(row, column).unwrap_or(0.0);
                write!(out, " {} |", format_score(score))?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::{analyze, AnalysisParams, Message};

    fn report() -> ActivityReport {
        let messages = vec![
            Message::new("Alice", "one two", "01.01.2023 10:00:00"),
            Message::new("Bob", "three", "01.01.2023 11:00:00"),
            Message::new("Alice", "four", "02.01.2023 10:00:00"),
            Message::new("Bob", "five six", "02.01.2023 11:00:00"),
            Message::new("Alice", "seven", "03.01.2023 09:00:00"),
            Message::new("Pipe|Name With Long Tail", "eight", "09.01.2023 09:00:00"),
        ];
        analyze(&messages, &AnalysisParams::default()).unwrap()
    }

    #[test]
    fn test_terminal_summary_lines() {
        let text = render_terminal(&report(), 20).unwrap();
        assert!(text.contains("Contributor Alice has contributed 3 messages with 4 words."));
        assert!(text.contains("Contributor Bob has contributed 2 messages with 3 words."));
        assert!(text.contains("Alice is most triggered by Bob"));
        assert!(text.contains("CORRELATION"));
    }

    #[test]
    fn test_terminal_respects_top() {
        let text = render_terminal(&report(), 1).unwrap();
        assert!(text.contains("Contributor Alice"));
        assert!(!text.contains("Contributor Bob"));
    }

    #[test]
    fn test_terminal_empty_report() {
        let empty = analyze(&[], &AnalysisParams::default()).unwrap();
        assert_eq!(render_terminal(&empty, 20).unwrap(), "No messages found.\n");
    }

    #[test]
    fn test_markdown_tables() {
        let text = render_markdown(&report(), 20).unwrap();
        assert!(text.starts_with("# Chat Activity Report"));
        assert!(text.contains("| 1 | Alice | 3 | 4 | 16 | 2023-01-01 | 2023-01-03 |"));
        assert!(text.contains("- **Bob** is most triggered by **Alice**"));
        assert!(text.contains("Pipe\\|Name With..."));
        assert!(text.contains("|---|---:|---:|---:|"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_writer_errors_propagate() {
        assert!(write_terminal(&mut FailingWriter, &report(), 20).is_err());
        assert!(write_markdown(&mut FailingWriter, &report(), 20).is_err());
    }
}
