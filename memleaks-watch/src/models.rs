use kfs_memleaks::{Outcome, Report, ScanError};
use serde::{Deserialize, Serialize};

/// Machine-readable result for one input
#[derive(Debug, Serialize, Deserialize)]
pub struct InputReport {
    pub source: String,
    pub outcome: Outcome,
    pub report: Option<Report>,
    pub error: Option<String>,
    /// Line the scan error refers to
    pub error_line: Option<usize>,
}

impl InputReport {
    pub fn new(source: &str, result: &Result<Report, ScanError>) -> Self {
        match result {
            Ok(report) => Self {
                source: source.to_string(),
                outcome: report.outcome(),
                report: Some(report.clone()),
                error: None,
                error_line: None,
            },
            Err(e) => Self {
                source: source.to_string(),
                outcome: Outcome::ScanFailed,
                report: None,
                error: Some(e.to_string()),
                error_line: e.line(),
            },
        }
    }
}
