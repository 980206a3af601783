use std::fmt::Write;

use crate::models::{Dimension, MonthRow};
use crate::trend;
use crate::window::Window;

pub fn build_report(
    school: &str,
    window: &Window,
    rows: &[MonthRow],
    dims: &[Dimension],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# School Wellness Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} to {})",
        school,
        window.start.label(),
        window.end.label()
    );
    let _ = writeln!(output);

    if dims.is_empty() {
        let _ = writeln!(output, "No wellness data recorded for this window.");
        return output;
    }

    let _ = writeln!(output, "## Monthly Overview");
    for row in rows {
        let summary = trend::summarize(row, dims);
        let _ = writeln!(
            output,
            "- {}: overall {}%, weakest {} ({}%)",
            row.month.label(),
            summary.overall,
            summary.weakest.dimension,
            trend::round_half_up(summary.weakest.value)
        );
    }

    let mut averages = trend::dimension_averages(rows, dims);
    averages.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Dimension Averages");
    for (label, average) in &averages {
        let _ = writeln!(output, "- {}: {:.1}%", label, average);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggested Focus");
    match rows
        .last()
        .map(|row| trend::summarize(row, dims))
        .and_then(|summary| trend::focus_suggestion(&summary))
    {
        Some(suggestion) => {
            let _ = writeln!(output, "{}", suggestion);
        }
        None => {
            let _ = writeln!(output, "No suggestion for this window.");
        }
    }

    output
}
