//! Lint engine interface and the built-in line engine.
//!
//! The pipeline only needs something that turns file arguments into a
//! `Report`; that is the `Engine` trait. `LineEngine` implements it with
//! the checks in `crate::checks`. Anything that stops the engine from
//! analysing (bad config, unreadable file, argument matching nothing) is
//! reported as a fatal record instead of an error value.

use crate::checks::{build_rules, run_checks, ActiveRule};
use crate::config::{load_config, resolve_extensions, NibblerConfig};
use crate::models::{Diagnostic, Report};
use glob::{glob_with, MatchOptions, Pattern};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
/// Options handed to `Engine::configure`.
pub struct EngineOptions {
    /// Extensions from the command line; may be empty.
    pub extensions: Vec<String>,
    pub config_file: Option<PathBuf>,
}

/// A lint engine the CLI can drive.
pub trait Engine {
    fn configure(&mut self, options: EngineOptions);
    fn run(&self, files: &[String]) -> Report;
}

/// Built-in engine running line-oriented checks over text files.
pub struct LineEngine {
    cwd: PathBuf,
    extensions: Vec<String>,
    rules: Vec<ActiveRule>,
    setup_errors: Vec<Diagnostic>,
}

impl LineEngine {
    /// Engine resolving relative arguments against `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let (rules, _) = build_rules(&NibblerConfig::default(), "");
        Self {
            cwd: cwd.into(),
            extensions: resolve_extensions(&[], &NibblerConfig::default()),
            rules,
            setup_errors: Vec::new(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn display_path(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.cwd)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .to_string()
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x == e))
    }

    /// Expand one argument into files. Explicit files are kept whatever
    /// their extension; directories are searched recursively.
    ///
    /// Only the argument's own text is treated as a pattern: the working
    /// directory, and a directory argument as a whole, are escaped.
    fn expand(&self, arg: &str) -> Result<Vec<PathBuf>, String> {
        let path = self.cwd.join(arg);
        if path.is_file() {
            return Ok(vec![path]);
        }
        let opts = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let (pattern, filter_ext) = if path.is_dir() {
            let dir = PathBuf::from(Pattern::escape(&path.to_string_lossy()));
            (dir.join("**").join("*"), true)
        } else if Path::new(arg).is_absolute() {
            (PathBuf::from(arg), false)
        } else {
            let cwd = PathBuf::from(Pattern::escape(&self.cwd.to_string_lossy()));
            (cwd.join(arg), false)
        };
        let entries = glob_with(&pattern.to_string_lossy(), opts).map_err(|e| e.to_string())?;
        Ok(entries
            .flatten()
            .filter(|p| p.is_file())
            .filter(|p| !p.components().any(|c| c.as_os_str() == "node_modules"))
            .filter(|p| !filter_ext || self.has_extension(p))
            .collect())
    }
}

impl Engine for LineEngine {
    fn configure(&mut self, options: EngineOptions) {
        self.setup_errors.clear();
        let cfg = match options.config_file.as_deref() {
            None => NibblerConfig::default(),
            Some(path) => match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::debug!(error = %e, "config load failed");
                    self.setup_errors.push(Diagnostic::fatal(
                        e.rule_id(),
                        e.to_string(),
                        self.display_path(e.path()),
                    ));
                    NibblerConfig::default()
                }
            },
        };
        let cfg_name = options
            .config_file
            .as_deref()
            .map(|p| self.display_path(p))
            .unwrap_or_default();
        let (rules, fatal) = build_rules(&cfg, &cfg_name);
        self.setup_errors.extend(fatal);
        self.rules = rules;
        self.extensions = resolve_extensions(&options.extensions, &cfg);
        tracing::debug!(
            extensions = ?self.extensions,
            rules = self.rules.len(),
            "engine configured"
        );
    }

    fn run(&self, files: &[String]) -> Report {
        let mut records = self.setup_errors.clone();
        let mut targets: BTreeSet<PathBuf> = BTreeSet::new();
        for arg in files {
            match self.expand(arg) {
                Ok(found) if !found.is_empty() => targets.extend(found),
                Ok(_) => records.push(Diagnostic::fatal(
                    "no-match",
                    format!("No files matching the pattern \"{arg}\" were found."),
                    arg.as_str(),
                )),
                Err(e) => records.push(Diagnostic::fatal(
                    "no-match",
                    format!("Invalid pattern \"{arg}\": {e}"),
                    arg.as_str(),
                )),
            }
        }
        tracing::debug!(files = targets.len(), "linting");

        let mut found: Vec<Diagnostic> = targets
            .par_iter()
            .flat_map_iter(|path| {
                let file = self.display_path(path);
                match fs::read_to_string(path) {
                    Ok(text) => run_checks(&self.rules, &text, &file),
                    Err(e) => vec![Diagnostic::fatal(
                        "read-file",
                        format!("Cannot read file: {e}"),
                        file,
                    )],
                }
            })
            .collect();
        // Deterministic ordering regardless of thread scheduling
        found.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then(a.line.cmp(&b.line))
                .then(a.column.cmp(&b.column))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        records.extend(found);
        Report::new(records)
    }
}
