//! Line classification
//!
//! Turns one line of trace output into at most one [`TraceEvent`]. Lines that
//! match none of the templates are noise and yield `None`.

use crate::config::ScanConfig;
use crate::error::Result;
use regex::Regex;

/// Width of the `SSSSSSSSSS.UUUUUU ` timestamp prefix
pub const TIMESTAMP_WIDTH: usize = 18;

const ENTER_SUFFIX: &str = ": enter";
const RETURN_SUFFIX: &str = ": return";

/// A recognized trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    /// Function entered
    Enter(&'a str),
    /// Function returned
    Return(&'a str),
    /// Memory allocated at `address`
    Alloc { address: u64, size: Option<u64> },
    /// Memory at `address` released
    Free { address: u64 },
}

/// Compiled line templates for one [`ScanConfig`]
#[derive(Debug, Clone)]
pub struct LineClassifier {
    trace_marker: String,
    memory_marker: String,
    timestamp: Regex,
    alloc: Regex,
    free: Regex,
}

impl LineClassifier {
    /// Compile the templates for `config`
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let alloc_keywords = config
            .alloc_keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            trace_marker: config.trace_marker.clone(),
            memory_marker: config.memory_marker.clone(),
            timestamp: Regex::new(r"^[0-9]{10}\.[0-9]{6} ")?,
            alloc: Regex::new(&format!(
                r"(?:{alloc_keywords})\b.*?(?:\b([0-9]+) bytes\b.*?)?0x([0-9a-fA-F]+)"
            ))?,
            free: Regex::new(&format!(
                r"{}\b.*?0x([0-9a-fA-F]+)",
                regex::escape(&config.free_keyword)
            ))?,
        })
    }

    /// Drop a leading `SSSSSSSSSS.UUUUUU ` timestamp if present
    pub fn strip_timestamp<'a>(&self, line: &'a str) -> &'a str {
        if self.timestamp.is_match(line) {
            // The pattern is pure ASCII, so this is a char boundary.
            &line[TIMESTAMP_WIDTH..]
        } else {
            line
        }
    }

    /// Classify one line of trace output
    pub fn classify<'a>(&self, line: &'a str) -> Option<TraceEvent<'a>> {
        let line = self.strip_timestamp(line.trim()).trim_start();

        if let Some(rest) = line.strip_prefix(self.trace_marker.as_str()) {
            return classify_trace(rest.trim_start());
        }

        if let Some(rest) = line.strip_prefix(self.memory_marker.as_str()) {
            return self.classify_memory(rest);
        }

        None
    }

    fn classify_memory<'a>(&self, rest: &'a str) -> Option<TraceEvent<'a>> {
        if let Some(caps) = self.alloc.captures(rest) {
            let address = parse_address(caps.get(2)?.as_str())?;
            let size = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
            return Some(TraceEvent::Alloc { address, size });
        }

        if let Some(caps) = self.free.captures(rest) {
            let address = parse_address(caps.get(1)?.as_str())?;
            return Some(TraceEvent::Free { address });
        }

        None
    }
}

fn classify_trace(rest: &str) -> Option<TraceEvent<'_>> {
    if let Some(name) = rest.strip_suffix(ENTER_SUFFIX) {
        let name = name.trim();
        return (!name.is_empty()).then_some(TraceEvent::Enter(name));
    }
    if let Some(name) = rest.strip_suffix(RETURN_SUFFIX) {
        let name = name.trim();
        return (!name.is_empty()).then_some(TraceEvent::Return(name));
    }
    None
}

fn parse_address(hex: &str) -> Option<u64> {
    match u64::from_str_radix(hex, 16) {
        Ok(address) => Some(address),
        Err(e) => {
            log::warn!("Ignoring memory line with unusable address 0x{}: {}", hex, e);
            None
        }
    }
}
