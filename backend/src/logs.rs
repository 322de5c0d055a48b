//! Leveled diagnostic events.
//!
//! The pipeline never prints directly. Every step reports through a
//! [`DiagnosticSink`] supplied by the caller, so the CLI can print to the
//! terminal while tests and run reports collect entries in memory.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single diagnostic event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Operation that emitted the event (e.g. "facility", "asset-ids")
    pub operation: String,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            operation: operation.into(),
            message: message.into(),
            indent: 0,
        }
    }

    pub fn info(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, operation, message)
    }

    pub fn success(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, operation, message)
    }

    pub fn warning(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, operation, message)
    }

    pub fn error(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, operation, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// Destination for diagnostic events.
pub trait DiagnosticSink {
    fn emit(&self, entry: LogEntry);
}

impl<F: Fn(LogEntry)> DiagnosticSink for F {
    fn emit(&self, entry: LogEntry) {
        self(entry)
    }
}

/// Prints entries to stderr with a level prefix.
///
/// Stdout is left alone so result tables can be piped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, entry: LogEntry) {
        let prefix = match entry.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(entry.indent as usize);
        eprintln!("{}{} [{}] {}", indent, prefix, entry.operation, entry.message);
    }
}

/// Drops every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _entry: LogEntry) {}
}

/// Collects entries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RefCell<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .count()
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries.into_inner()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, entry: LogEntry) {
        self.entries.borrow_mut().push(entry);
    }
}

/// Forwards every entry to two sinks.
pub struct Tee<'a> {
    first: &'a dyn DiagnosticSink,
    second: &'a dyn DiagnosticSink,
}

impl<'a> Tee<'a> {
    pub fn new(first: &'a dyn DiagnosticSink, second: &'a dyn DiagnosticSink) -> Self {
        Self { first, second }
    }
}

impl DiagnosticSink for Tee<'_> {
    fn emit(&self, entry: LogEntry) {
        self.first.emit(entry.clone());
        self.second.emit(entry);
    }
}

/// Convenient logging functions bound to one operation name.
#[derive(Clone, Copy)]
pub struct Diagnostics<'a> {
    sink: &'a dyn DiagnosticSink,
    operation: &'static str,
}

impl<'a> Diagnostics<'a> {
    pub fn new(sink: &'a dyn DiagnosticSink, operation: &'static str) -> Self {
        Self { sink, operation }
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.sink.emit(LogEntry::info(self.operation, msg));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.sink.emit(LogEntry::success(self.operation, msg));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.sink.emit(LogEntry::warning(self.operation, msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.sink.emit(LogEntry::error(self.operation, msg));
    }

    pub fn info_indent(&self, msg: impl Into<String>, indent: u8) {
        self.sink
            .emit(LogEntry::info(self.operation, msg).with_indent(indent));
    }
}
