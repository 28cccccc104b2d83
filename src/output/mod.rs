//! Formatter registry and built-in report renderers.
//!
//! Every formatter is a pure function from a `ReportView` to text. A
//! formatter can be looked up by registered name (`"stylish"`) or passed
//! directly as a value; both go through `format_report`.
//!
//! Built-ins:
//! - `stylish`: one line per diagnostic, grouped by file, with a footer.
//! - `stats`: per-severity totals.
//! - `summary`: counts per rule, most frequent first.
//! - `detailed`: message, file, line and column for every record.
//! - `json`: records plus counters as pretty JSON.
//!
//! Colorization is fixed when a formatter is constructed; rendering never
//! consults the environment.

mod detailed;
mod json;
mod stats;
mod stylish;
mod summary;

pub use detailed::Detailed;
pub use json::Json;
pub use stats::Stats;
pub use stylish::Stylish;
pub use summary::{rule_counts, Summary};

use crate::models::{ReportView, Severity};
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub const STYLISH: &str = "stylish";
pub const STATS: &str = "stats";
pub const SUMMARY: &str = "summary";
pub const DETAILED: &str = "detailed";
pub const JSON: &str = "json";

/// A pure renderer from report data to text.
pub trait Formatter: Send + Sync {
    fn render(&self, view: &ReportView<'_>) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&ReportView<'_>) -> String + Send + Sync,
{
    fn render(&self, view: &ReportView<'_>) -> String {
        self(view)
    }
}

/// How a caller selects a formatter: by registered name or by value.
#[derive(Clone, Copy)]
pub enum FormatterRef<'f> {
    Named(&'f str),
    Value(&'f dyn Formatter),
}

impl<'f> From<&'f str> for FormatterRef<'f> {
    fn from(name: &'f str) -> Self {
        FormatterRef::Named(name)
    }
}

impl<'f> From<&'f dyn Formatter> for FormatterRef<'f> {
    fn from(formatter: &'f dyn Formatter) -> Self {
        FormatterRef::Value(formatter)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown formatter '{0}'")]
    UnknownFormatter(String),
}

#[derive(Clone, Default)]
/// Named formatters available to the pipeline.
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<dyn Formatter>>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in formatter registered.
    pub fn with_builtins(color: bool) -> Self {
        let mut reg = Self::new();
        reg.register(STYLISH, Stylish { color });
        reg.register(STATS, Stats { color });
        reg.register(SUMMARY, Summary { color });
        reg.register(DETAILED, Detailed { color });
        reg.register(JSON, Json);
        reg
    }

    /// Register `formatter` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, formatter: impl Formatter + 'static) {
        self.formatters.insert(name.into(), Arc::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| &**f)
    }

    /// Sorted list of registered names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Render `view` with the formatter `fref` refers to.
    pub fn format_report<'f>(
        &self,
        view: &ReportView<'_>,
        fref: impl Into<FormatterRef<'f>>,
    ) -> Result<String, FormatError> {
        let formatter = match fref.into() {
            FormatterRef::Named(name) => self
                .get(name)
                .ok_or_else(|| FormatError::UnknownFormatter(name.to_string()))?,
            FormatterRef::Value(f) => f,
        };
        Ok(formatter.render(view))
    }
}

fn severity_label(severity: Severity, color: bool) -> String {
    let label = severity.to_string();
    if !color {
        return label;
    }
    match severity {
        Severity::Warning => label.yellow().to_string(),
        Severity::Error => label.red().to_string(),
        Severity::Fatal => label.red().bold().to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
