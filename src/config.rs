//! Scan configuration
//!
//! Markers and keywords default to what KennyFS' logging macros emit.

/// Prefix of function enter/return lines
pub const DEFAULT_TRACE_MARKER: &str = "[kfs_trace]";

/// Prefix of debug lines logged by the memory wrappers
pub const DEFAULT_MEMORY_MARKER: &str = "[kfs_debug] kfs_memory.c:";

/// Keywords that announce an allocation
pub const DEFAULT_ALLOC_KEYWORDS: &[&str] = &["kfs_malloc", "kfs_calloc"];

/// Keyword that announces a free
pub const DEFAULT_FREE_KEYWORD: &str = "kfs_free";

/// Scan configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Marker at the start of trace lifecycle lines
    pub trace_marker: String,
    /// Marker at the start of memory subsystem debug lines
    pub memory_marker: String,
    /// Allocation keywords matched inside memory lines
    pub alloc_keywords: Vec<String>,
    /// Free keyword matched inside memory lines
    pub free_keyword: String,
    /// Abort on a return without matching enter instead of dropping attribution
    pub strict_stack: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            trace_marker: DEFAULT_TRACE_MARKER.to_string(),
            memory_marker: DEFAULT_MEMORY_MARKER.to_string(),
            alloc_keywords: DEFAULT_ALLOC_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            free_keyword: DEFAULT_FREE_KEYWORD.to_string(),
            strict_stack: false,
        }
    }
}

impl ScanConfig {
    /// Override the trace marker
    pub fn with_trace_marker(mut self, marker: impl Into<String>) -> Self {
        self.trace_marker = marker.into();
        self
    }

    /// Override the memory marker
    pub fn with_memory_marker(mut self, marker: impl Into<String>) -> Self {
        self.memory_marker = marker.into();
        self
    }

    /// Make stack underflow fatal
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_stack = strict;
        self
    }
}
