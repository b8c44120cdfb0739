use kfs_memleaks::{LineClassifier, Report, ScanConfig, ScanSession, lossy_lines};
use std::io::{BufRead, Write};

/// Scan one input, echoing every line with its number to `echo` if given.
pub fn scan_input<R: BufRead>(
    reader: R,
    config: &ScanConfig,
    mut echo: Option<&mut dyn Write>,
) -> kfs_memleaks::Result<Report> {
    let classifier = LineClassifier::new(config)?;
    let mut session = ScanSession::new(&classifier, config);

    for line in lossy_lines(reader) {
        let line = line?;
        if let Some(out) = echo.as_mut() {
            writeln!(out, "{}: {}", session.lines_scanned() + 1, line.trim())?;
        }
        session.feed(&line)?;
    }

    let report = session.finish();
    log::info!(
        "scanned {} lines: {} allocations, {} leaks",
        report.lines_scanned,
        report.stats.allocations,
        report.leak_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "\
[kfs_trace] foo: enter
[kfs_debug] kfs_memory.c: kfs_malloc 16 bytes 0xAAAA
[kfs_trace] foo: return
";

    #[test]
    fn test_scan_without_echo() {
        let report = scan_input(TRACE.as_bytes(), &ScanConfig::default(), None).unwrap();
        assert_eq!(report.leak_count(), 1);
        assert_eq!(report.lines_scanned, 3);
    }

    #[test]
    fn test_echo_numbers_lines() {
        let mut echoed = Vec::new();
        scan_input(
            TRACE.as_bytes(),
            &ScanConfig::default(),
            Some(&mut echoed as &mut dyn Write),
        )
        .unwrap();
        let echoed = String::from_utf8(echoed).unwrap();
        let lines: Vec<_> = echoed.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1: [kfs_trace] foo: enter");
        assert_eq!(lines[2], "3: [kfs_trace] foo: return");
    }

    #[test]
    fn test_echo_stops_at_scan_error() {
        let trace = "[kfs_debug] kfs_memory.c: kfs_free 0x1\nnever reached\n";
        let mut echoed = Vec::new();
        let result = scan_input(
            trace.as_bytes(),
            &ScanConfig::default(),
            Some(&mut echoed as &mut dyn Write),
        );
        assert!(result.is_err());
        assert_eq!(String::from_utf8(echoed).unwrap(), "1: [kfs_debug] kfs_memory.c: kfs_free 0x1\n");
    }

    #[test]
    fn test_invalid_utf8_noise_is_echoed_and_skipped() {
        let trace: &[u8] = b"[kfs_debug] kfs_memory.c: kfs_malloc 16 bytes 0xAAAA\n\
kfs_WARNING: open /mnt/caf\xe9 failed\n\
[kfs_debug] kfs_memory.c: kfs_free 0xAAAA\n";
        let mut echoed = Vec::new();
        let report = scan_input(
            trace,
            &ScanConfig::default(),
            Some(&mut echoed as &mut dyn Write),
        )
        .unwrap();
        assert!(report.leaks.is_empty());
        assert_eq!(report.lines_scanned, 3);
        let echoed = String::from_utf8(echoed).unwrap();
        assert!(echoed.contains("2: kfs_WARNING: open /mnt/caf\u{fffd} failed\n"));
    }
}
