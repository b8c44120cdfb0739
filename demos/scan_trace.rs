//! Scan a trace file (or the bundled sample) and print what leaked.
//!
//! ```text
//! cargo run --example scan_trace [TRACE_FILE]
//! ```

use kfs_memleaks::{scan_reader, Outcome, ScanConfig};
use std::fs::File;
use std::io::BufReader;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/sample_trace.log").to_string());

    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("[scan_trace] Could not open {}: {}", path, e);
            std::process::exit(Outcome::ScanFailed.exit_code().into());
        }
    };

    let report = match scan_reader(BufReader::new(file), &ScanConfig::default()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[scan_trace] Scan failed: {}", e);
            std::process::exit(Outcome::ScanFailed.exit_code().into());
        }
    };

    println!("[scan_trace] {} lines, {} allocations, peak {} bytes",
        report.lines_scanned, report.stats.allocations, report.stats.peak_bytes);

    for leak in &report.leaks {
        println!(
            "  line {:>5}  0x{:<10x} {:>6} bytes  in {}",
            leak.line,
            leak.address,
            leak.size.map(|s| s.to_string()).unwrap_or_else(|| "?".into()),
            leak.function.as_deref().unwrap_or("<unknown>")
        );
    }

    std::process::exit(report.outcome().exit_code().into());
}
