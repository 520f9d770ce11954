//! End of run summary.

use super::terminal::format_field;
use crate::models::SkipReason;
use crate::RunOutcome;
use colored::Colorize;

const VALUE_WIDTH: usize = 10;

/// How a summary line is shown on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Highlight {
    Plain,
    Warn,
    Status,
}

fn count_line(label: &str, count: usize) -> (String, Highlight) {
    (format_field(label, count, VALUE_WIDTH), Highlight::Plain)
}

fn skip_line(label: &str, count: usize) -> (String, Highlight) {
    let highlight = if count > 0 {
        Highlight::Warn
    } else {
        Highlight::Plain
    };
    (format_field(label, count, VALUE_WIDTH), highlight)
}

fn styled_lines(outcome: &RunOutcome) -> Vec<(String, Highlight)> {
    let stats = &outcome.result.stats;
    let status = match (outcome.changes.is_unchanged(), outcome.written) {
        (true, _) => "unchanged",
        (false, true) => "rewritten",
        (false, false) => "changed",
    };
    vec![
        count_line("rows_total", stats.total),
        count_line("rows_matched", stats.matched),
        count_line("rows_unmatched", stats.unmatched),
        skip_line(
            "skipped_range_order",
            stats.skipped_by(SkipReason::RangeOrder),
        ),
        skip_line(
            "skipped_address_family",
            stats.skipped_by(SkipReason::AddressFamily),
        ),
        skip_line("skipped_malformed", stats.skipped_by(SkipReason::Malformed)),
        count_line("unique_cidrs", outcome.result.len()),
        count_line("cidrs_added", outcome.changes.added.len()),
        count_line("cidrs_removed", outcome.changes.removed.len()),
        (
            format_field("snapshot", status, VALUE_WIDTH),
            Highlight::Status,
        ),
    ]
}

/// Plain text summary rows, one per counter.
pub fn summary_lines(outcome: &RunOutcome) -> Vec<String> {
    styled_lines(outcome)
        .into_iter()
        .map(|(line, _)| line)
        .collect()
}

/// Print the summary to stdout, highlighting skipped rows and the snapshot status.
pub fn print_summary(outcome: &RunOutcome) {
    for (line, highlight) in styled_lines(outcome) {
        match highlight {
            Highlight::Plain => println!("{line}"),
            Highlight::Warn => println!("{}", line.yellow()),
            Highlight::Status => println!("{}", line.on_blue()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{aggregate, ChangeReport, RowFilter};
    use crate::models::SourceRow;
    use std::collections::HashSet;

    fn sample_outcome() -> RunOutcome {
        let rows = vec![
            SourceRow::range("1.0.0.0", "1.0.0.255", "CN", "AS4134"),
            SourceRow::range("1.0.0.9", "1.0.0.1", "CN", "AS4134"),
        ];
        let result = aggregate(rows, &RowFilter::new("CN", ["AS4134"]));
        let changes = ChangeReport::compare(&HashSet::new(), &result.cidrs);
        RunOutcome {
            result,
            changes,
            written: true,
        }
    }

    #[test]
    fn test_summary_highlights_follow_counts() {
        let highlights: Vec<Highlight> = styled_lines(&sample_outcome())
            .into_iter()
            .map(|(_, h)| h)
            .collect();
        assert_eq!(highlights[3], Highlight::Warn, "one range order skip");
        assert_eq!(highlights[4], Highlight::Plain);
        assert_eq!(highlights[5], Highlight::Plain);
        assert_eq!(highlights[9], Highlight::Status);
    }

    #[test]
    fn test_skip_line_zero_with_wide_count() {
        // A count like 10 ends in "0" but is still nonzero.
        assert_eq!(skip_line("skipped_malformed", 10).1, Highlight::Warn);
        assert_eq!(skip_line("skipped_malformed", 0).1, Highlight::Plain);
    }

    #[test]
    fn test_summary_lines() {
        let outcome = sample_outcome();
        let lines = summary_lines(&outcome);
        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("rows_total"));
        assert!(lines[0].ends_with(" 2"));
        assert!(lines[3].ends_with(" 1"), "one range order skip");
        assert!(lines[9].ends_with("rewritten"));
    }
}
