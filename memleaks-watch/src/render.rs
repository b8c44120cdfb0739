//! Human-readable report output

use colored::Colorize;
use kfs_memleaks::Report;
use std::io::{self, Write};

/// Shown in place of a function name when the trace cannot attribute a leak
pub const NO_TRACE_INFO: &str = "<no trace information available>";

/// Write `report` as text. `stats` adds the allocation statistics preamble.
pub fn write_report<W: Write>(out: &mut W, report: &Report, stats: bool) -> io::Result<()> {
    if stats {
        writeln!(out, "Total allocations:       {}", report.stats.allocations)?;
        writeln!(out, "Total bytes allocated:   {}", report.stats.total_bytes)?;
        writeln!(out, "Peak bytes allocated:    {}", report.stats.peak_bytes)?;
        writeln!(out)?;
    }

    if let Some(line) = report.attribution_lost_at {
        writeln!(
            out,
            "{}",
            format!(
                "Warning: return without matching enter at line {}; later leaks are not attributed.",
                line
            )
            .yellow()
        )?;
    }

    if !report.has_leaks() {
        writeln!(out, "{}", "No memory leaks detected.".green())?;
        return Ok(());
    }

    writeln!(out, "{}", "Mallocs that were never freed:".bold())?;
    writeln!(out)?;
    writeln!(out, "{:>8} | {:>10} | {:<18} | {}", "Line", "Bytes", "Address", "Function")?;
    writeln!(out, "{}", "-".repeat(70).dimmed())?;
    for leak in &report.leaks {
        let size = leak
            .size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let function = match &leak.function {
            Some(name) => name.normal(),
            None => NO_TRACE_INFO.dimmed(),
        };
        writeln!(
            out,
            "{:>8} | {:>10} | {:<18} | {}",
            leak.line,
            size,
            format!("0x{:x}", leak.address),
            function
        )?;
    }
    writeln!(
        out,
        "{}",
        format!(
            "Total memory leaks: {} ({} bytes)",
            report.leak_count(),
            report.leaked_bytes()
        )
        .red()
        .bold()
    )?;
    Ok(())
}
