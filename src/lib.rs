//! Nibbler core library.
//!
//! Runs a lint engine over source files and presents the resulting report
//! in stages: a fatal dump when analysis could not complete, otherwise
//! statistics, a per-rule summary and an interactive per-rule detail.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and loading of `nibbler.toml|yaml`.
//! - `models`: Diagnostic records, the report and its filtered views.
//! - `classify`: Fatal-severity classification.
//! - `output`: Formatter trait, registry and built-in renderers.
//! - `pipeline`: Phase 1 of a run, from report to exit code.
//! - `interactive`: Phase 2, the per-rule drill-down.
//! - `lint`: Engine trait and the built-in line engine.
//! - `checks`: Rule checks used by the built-in engine.
//! - `utils`: Console helpers.
pub mod checks;
pub mod classify;
pub mod cli;
pub mod config;
pub mod interactive;
pub mod lint;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod utils;

/// Crate version, injected at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
