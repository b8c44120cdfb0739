//! Leak scanner
//!
//! A [`ScanSession`] folds classified lines into a call stack and a table of
//! outstanding allocations. Whatever is left in the table when the input ends
//! is reported as leaked.

use crate::classify::{LineClassifier, TraceEvent};
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::report::{AllocationStats, Leak, Report};
use std::collections::HashMap;
use std::io::{self, BufRead};

/// An allocation that has not been freed yet
#[derive(Debug, Clone)]
struct AllocationRecord {
    line: usize,
    sequence: u64,
    size: Option<u64>,
    function: Option<String>,
}

/// State of one scan over one input stream
pub struct ScanSession<'c> {
    classifier: &'c LineClassifier,
    strict_stack: bool,
    stack: Vec<String>,
    outstanding: HashMap<u64, AllocationRecord>,
    stats: AllocationStats,
    line: usize,
    sequence: u64,
    /// Set once a return underflowed the stack; owners are unknown from then on
    attribution_lost_at: Option<usize>,
}

impl<'c> ScanSession<'c> {
    pub fn new(classifier: &'c LineClassifier, config: &ScanConfig) -> Self {
        Self {
            classifier,
            strict_stack: config.strict_stack,
            stack: Vec::new(),
            outstanding: HashMap::new(),
            stats: AllocationStats::default(),
            line: 0,
            sequence: 0,
            attribution_lost_at: None,
        }
    }

    /// Feed the next line of input. Returns its 1-based line number.
    pub fn feed(&mut self, line: &str) -> Result<usize> {
        self.line += 1;
        if let Some(event) = self.classifier.classify(line) {
            self.apply(event)?;
        }
        Ok(self.line)
    }

    /// Number of lines fed so far
    pub fn lines_scanned(&self) -> usize {
        self.line
    }

    /// Counters as of the last fed line
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    /// Number of currently outstanding allocations
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    fn apply(&mut self, event: TraceEvent<'_>) -> Result<()> {
        match event {
            TraceEvent::Enter(name) => {
                log::trace!("line {}: enter {}", self.line, name);
                self.stack.push(name.to_string());
            }
            TraceEvent::Return(name) => match self.pop_frame(name) {
                Ok(()) => {}
                Err(err @ ScanError::CorruptTrace { .. }) if !self.strict_stack => {
                    if self.attribution_lost_at.is_none() {
                        log::warn!("{}; allocations from here on are not attributed", err);
                        self.attribution_lost_at = Some(self.line);
                    }
                }
                Err(err) => return Err(err),
            },
            TraceEvent::Alloc { address, size } => self.allocate(address, size)?,
            TraceEvent::Free { address } => self.free(address)?,
        }
        Ok(())
    }

    fn pop_frame(&mut self, name: &str) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or(ScanError::CorruptTrace { line: self.line })?;
        if frame != name {
            log::debug!(
                "line {}: return from {} while {} is on top of the stack",
                self.line,
                name,
                frame
            );
        }
        Ok(())
    }

    fn owner(&self) -> Option<String> {
        if self.attribution_lost_at.is_some() {
            return None;
        }
        self.stack.last().cloned()
    }

    fn allocate(&mut self, address: u64, size: Option<u64>) -> Result<()> {
        if let Some(existing) = self.outstanding.get(&address) {
            return Err(ScanError::DuplicateAllocation {
                address,
                line: self.line,
                first_line: existing.line,
            });
        }

        self.stats.record_alloc(size);
        let record = AllocationRecord {
            line: self.line,
            sequence: self.sequence,
            size,
            function: self.owner(),
        };
        self.sequence += 1;
        log::debug!(
            "line {}: alloc 0x{:x} ({:?} bytes) in {:?}",
            self.line,
            address,
            size,
            record.function
        );
        self.outstanding.insert(address, record);
        Ok(())
    }

    fn free(&mut self, address: u64) -> Result<()> {
        let record = self
            .outstanding
            .remove(&address)
            .ok_or(ScanError::UnknownFree {
                address,
                line: self.line,
            })?;
        self.stats.record_free(record.size);
        log::debug!(
            "line {}: free 0x{:x} allocated at line {}",
            self.line,
            address,
            record.line
        );
        Ok(())
    }

    /// End the scan and report what is still outstanding
    pub fn finish(self) -> Report {
        let mut records: Vec<_> = self.outstanding.into_iter().collect();
        records.sort_by_key(|(_, r)| (r.line, r.sequence));

        let leaks = records
            .into_iter()
            .map(|(address, r)| Leak {
                line: r.line,
                address,
                size: r.size,
                function: r.function,
            })
            .collect();

        Report {
            leaks,
            stats: self.stats,
            lines_scanned: self.line,
            attribution_lost_at: self.attribution_lost_at,
        }
    }
}

/// Scan a sequence of lines
pub fn scan<I, S>(lines: I, config: &ScanConfig) -> Result<Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let classifier = LineClassifier::new(config)?;
    let mut session = ScanSession::new(&classifier, config);
    for line in lines {
        session.feed(line.as_ref())?;
    }
    Ok(session.finish())
}

/// Scan a buffered text stream
pub fn scan_reader<R: BufRead>(reader: R, config: &ScanConfig) -> Result<Report> {
    let classifier = LineClassifier::new(config)?;
    let mut session = ScanSession::new(&classifier, config);
    for line in lossy_lines(reader) {
        session.feed(&line?)?;
    }
    Ok(session.finish())
}

/// Lines of a byte stream. Invalid UTF-8 is replaced instead of rejected,
/// since traced programs log raw path bytes.
pub fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

/// Iterator returned by [`lossy_lines`]
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
