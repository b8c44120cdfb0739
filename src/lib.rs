//! kfs_memleaks - find memory that a traced KennyFS run never freed
//!
//! KennyFS built with trace logging writes a line for every function enter and
//! return, and its memory wrappers log every allocation and free with the
//! address involved. This crate scans that output in one pass and reports the
//! allocations that are still outstanding when the input ends.
//!
//! # Architecture
//!
//! - **Line Classifier** ([`LineClassifier`]): turns raw lines into
//!   [`TraceEvent`]s, ignoring anything it does not recognize
//! - **Leak Scanner** ([`ScanSession`], [`scan`]): tracks the call stack and the
//!   outstanding allocations, and produces a [`Report`]
//!
//! # Example
//!
//! ```
//! use kfs_memleaks::{scan, ScanConfig};
//!
//! let trace = [
//!     "[kfs_trace] foo: enter",
//!     "[kfs_debug] kfs_memory.c: kfs_malloc 16 bytes 0xAAAA",
//!     "[kfs_trace] foo: return",
//! ];
//! let report = scan(trace, &ScanConfig::default()).unwrap();
//! assert_eq!(report.leak_count(), 1);
//! assert_eq!(report.leaks[0].function.as_deref(), Some("foo"));
//! ```

pub mod error;
pub mod config;
pub mod classify;
pub mod report;
pub mod scanner;

pub use error::{ScanError, Result};
pub use config::ScanConfig;
pub use classify::{LineClassifier, TraceEvent};
pub use report::{AllocationStats, Leak, Outcome, Report};
pub use scanner::{lossy_lines, scan, scan_reader, LossyLines, ScanSession};
