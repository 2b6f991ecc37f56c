//! Human-readable output for the CLI.
//!
//! Reports themselves are written by the library; this module renders the
//! stderr status summary and the `islands` diagnostic listing.

use std::io::{self, Write};
use std::time::Duration;

use cableroute_lib::{BatchReport, IslandReport};

use crate::terminal::ColorPalette;

/// Print one line per status present in the report, followed by the total.
pub fn write_status_summary<W: Write>(
    report: &BatchReport,
    palette: &ColorPalette,
    out: &mut W,
) -> io::Result<()> {
    for (status, count) in report.status_counts() {
        writeln!(
            out,
            "{}{:<40}{} {}{count}{}",
            palette.status(status),
            status.label(),
            palette.reset,
            palette.white_bold,
            palette.reset,
        )?;
    }
    writeln!(
        out,
        "{}Routed {} cable(s){}{}",
        palette.gray,
        report.records.len(),
        if report.cancelled { " (cancelled)" } else { "" },
        palette.reset,
    )
}

/// Render the islands of one cable as plain text.
pub fn write_island_listing<W: Write>(report: &IslandReport, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "Cable {}: {} island(s), {} accuracy",
        report.reference,
        report.islands.len(),
        match report.accuracy {
            cableroute_lib::Accuracy::High => "high",
            cableroute_lib::Accuracy::Standard => "standard",
        }
    )?;
    for (i, island) in report.islands.iter().enumerate() {
        let members: Vec<String> = island.elements.iter().map(i64::to_string).collect();
        writeln!(out, "Island {}: {}", i + 1, members.join(", "))?;
        for (label, candidates) in [("entry", &island.entry_points), ("exit", &island.exit_points)] {
            if candidates.is_empty() {
                writeln!(out, "  {label}: none")?;
                continue;
            }
            let rendered: Vec<String> = candidates
                .iter()
                .map(|candidate| format!("{} ({:.2})", candidate.id, candidate.distance))
                .collect();
            writeln!(out, "  {label}: {}", rendered.join(", "))?;
        }
    }
    if !report.unknown_containment.is_empty() {
        let unknown: Vec<String> = report
            .unknown_containment
            .iter()
            .map(i64::to_string)
            .collect();
        writeln!(out, "Unknown containment ids: {}", unknown.join(", "))?;
    }
    Ok(())
}

/// Format the elapsed time for the completion footer.
pub fn format_elapsed(elapsed: Duration) -> String {
    let elapsed_ms = elapsed.as_millis();
    if elapsed_ms < 1000 {
        format!("{elapsed_ms}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}
