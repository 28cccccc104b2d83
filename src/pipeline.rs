//! Presentation pipeline: turns one `Report` into ordered console output.
//!
//! Stages:
//!
//! ```text
//! Start ─┬─ HasFatal ── FatalReport                      (exit 1)
//!        └─ NoFatal ─┬─ Clean                            (exit 0)
//!                    └─ Stats ── Summary ── AwaitRuleInput (exit 0)
//!                                              └─ Detail  (phase 2)
//! ```
//!
//! `Pipeline::run` is phase 1. It runs synchronously up to `Summary` and
//! fixes the exit code there. When findings exist it also hands back a
//! `DrillDown`, which the caller resolves later against an input channel
//! (phase 2). Nothing in phase 2 can change the exit code.
//!
//! `Pipeline::render_with` is the non-interactive alternative: the whole
//! report through one named formatter, exit 1 only when fatal records exist.

use crate::classify::classify_fatal;
use crate::interactive::DrillDown;
use crate::models::Report;
use crate::output::{FormatError, FormatterRegistry, STATS, STYLISH, SUMMARY};
use crate::utils::paint;
use owo_colors::OwoColorize;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

pub const FATAL_ADVISORY: &str = "Fatal error(s) were detected.  Please correct and try again.";
pub const CLEAN_MESSAGE: &str = "Great job, all lint rules passed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    HasFatal,
    FatalReport,
    NoFatal,
    Clean,
    Stats,
    Summary,
    AwaitRuleInput,
    Detail,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result of phase 1.
pub struct Decision {
    /// Process exit code. Final once phase 1 returns.
    pub exit_code: i32,
    /// Stages visited, in order.
    pub trail: Vec<Stage>,
    /// Pending interactive work, present only after `Summary`.
    pub drill_down: Option<DrillDown>,
}

impl Decision {
    /// Last stage reached in phase 1.
    pub fn stage(&self) -> Stage {
        self.trail.last().copied().unwrap_or(Stage::Start)
    }
}

pub struct Pipeline {
    registry: Arc<FormatterRegistry>,
    color: bool,
}

impl Pipeline {
    pub fn new(registry: Arc<FormatterRegistry>, color: bool) -> Self {
        Self { registry, color }
    }

    /// Run phase 1 over `report`, writing to `out` (stdout) and `err`
    /// (stderr).
    pub fn run<O: Write, E: Write>(
        &self,
        report: Report,
        out: &mut O,
        err: &mut E,
    ) -> Result<Decision, PipelineError> {
        let mut trail = Vec::new();
        enter(&mut trail, Stage::Start);

        if let Some(fatal) = classify_fatal(&report) {
            enter(&mut trail, Stage::HasFatal);
            let text = self.registry.format_report(&fatal, STYLISH)?;
            writeln!(out, "{text}")?;
            writeln!(err, "{FATAL_ADVISORY}")?;
            enter(&mut trail, Stage::FatalReport);
            return Ok(Decision {
                exit_code: EXIT_FAILURE,
                trail,
                drill_down: None,
            });
        }
        enter(&mut trail, Stage::NoFatal);

        if report.error_count() == 0 && report.warning_count() == 0 {
            writeln!(
                out,
                "{}",
                paint(self.color, CLEAN_MESSAGE, |s| s.green().to_string())
            )?;
            enter(&mut trail, Stage::Clean);
            return Ok(Decision {
                exit_code: EXIT_OK,
                trail,
                drill_down: None,
            });
        }

        let view = report.view();
        writeln!(out, "{}", self.registry.format_report(&view, STATS)?)?;
        enter(&mut trail, Stage::Stats);
        writeln!(out, "{}", self.registry.format_report(&view, SUMMARY)?)?;
        enter(&mut trail, Stage::Summary);
        out.flush()?;

        enter(&mut trail, Stage::AwaitRuleInput);
        Ok(Decision {
            exit_code: EXIT_OK,
            trail,
            drill_down: Some(DrillDown::new(
                report,
                Arc::clone(&self.registry),
                self.color,
            )),
        })
    }

    /// Render all of `report` with the formatter registered as `name`.
    pub fn render_with<O: Write>(
        &self,
        report: &Report,
        name: &str,
        out: &mut O,
    ) -> Result<i32, PipelineError> {
        let text = self.registry.format_report(&report.view(), name)?;
        if !text.is_empty() {
            writeln!(out, "{text}")?;
        }
        out.flush()?;
        Ok(match classify_fatal(report) {
            Some(_) => EXIT_FAILURE,
            None => EXIT_OK,
        })
    }
}

fn enter(trail: &mut Vec<Stage>, stage: Stage) {
    tracing::debug!(?stage, "pipeline stage");
    trail.push(stage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::{DetailOutcome, RULE_PROMPT};
    use crate::models::{Diagnostic, Severity};
    use tokio::sync::mpsc;

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(FormatterRegistry::with_builtins(false)), false)
    }

    fn run(report: Report) -> (Decision, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let decision = pipeline().run(report, &mut out, &mut err).unwrap();
        (
            decision,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_fatal_short_circuits_before_stats() {
        let report = Report::new(vec![
            Diagnostic::new("semi", Severity::Error, "Missing semicolon", "a.js", 1, 9),
            Diagnostic::fatal("read-file", "Cannot read file: permission denied", "b.js"),
        ]);
        let (decision, out, err) = run(report);
        assert_eq!(decision.exit_code, EXIT_FAILURE);
        assert_eq!(
            decision.trail,
            vec![Stage::Start, Stage::HasFatal, Stage::FatalReport]
        );
        assert!(decision.drill_down.is_none());
        assert!(out.starts_with("b.js\n"));
        assert!(out.contains("fatal  Cannot read file: permission denied  read-file"));
        assert!(!out.contains("Missing semicolon"));
        assert!(!out.contains("Lint statistics"));
        assert!(!out.contains("Rules violated"));
        assert_eq!(err, format!("{FATAL_ADVISORY}\n"));
    }

    #[test]
    fn test_fatal_only_report_is_still_fatal() {
        let report = Report::new(vec![Diagnostic::fatal(
            "parse-config",
            "Config is not valid TOML",
            "nibbler.toml",
        )]);
        let (decision, _, err) = run(report);
        assert_eq!(decision.stage(), Stage::FatalReport);
        assert_eq!(decision.exit_code, 1);
        assert!(err.contains(FATAL_ADVISORY));
    }

    #[test]
    fn test_clean_report_prints_acknowledgement_only() {
        let (decision, out, err) = run(Report::new(Vec::new()));
        assert_eq!(decision.exit_code, EXIT_OK);
        assert_eq!(
            decision.trail,
            vec![Stage::Start, Stage::NoFatal, Stage::Clean]
        );
        assert!(decision.drill_down.is_none());
        assert_eq!(out, format!("{CLEAN_MESSAGE}\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_findings_run_stats_then_summary() {
        let report = Report::new(vec![
            Diagnostic::new("ruleX", Severity::Error, "x is bad", "a.js", 1, 1),
            Diagnostic::new("ruleX", Severity::Error, "x is bad again", "a.js", 4, 2),
            Diagnostic::new("ruleY", Severity::Warning, "y is iffy", "b.js", 2, 8),
        ]);
        let (decision, out, err) = run(report);
        assert_eq!(decision.exit_code, EXIT_OK);
        assert_eq!(
            decision.trail,
            vec![
                Stage::Start,
                Stage::NoFatal,
                Stage::Stats,
                Stage::Summary,
                Stage::AwaitRuleInput
            ]
        );
        assert!(err.is_empty());
        let stats_at = out.find("  Errors:   2\n  Warnings: 1").unwrap();
        let summary_at = out.find("Rules violated\n  ruleX  2\n  ruleY  1").unwrap();
        assert!(stats_at < summary_at);
        assert!(!out.contains(RULE_PROMPT));
    }

    #[test]
    fn test_render_with_named_formatter() {
        let report = Report::new(vec![
            Diagnostic::new("ruleX", Severity::Error, "x is bad", "a.js", 1, 1),
            Diagnostic::new("ruleY", Severity::Warning, "y is iffy", "b.js", 2, 8),
        ]);
        let mut out = Vec::new();
        let code = pipeline().render_with(&report, "json", &mut out).unwrap();
        assert_eq!(code, EXIT_OK);
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["summary"]["errors"], 1);
        assert_eq!(v["results"].as_array().map(Vec::len), Some(2));

        let fatal = Report::new(vec![Diagnostic::fatal("no-match", "nothing", "x")]);
        let mut out = Vec::new();
        let code = pipeline().render_with(&fatal, "stylish", &mut out).unwrap();
        assert_eq!(code, EXIT_FAILURE);
        assert!(String::from_utf8(out).unwrap().contains("no-match"));

        let err = pipeline()
            .render_with(&report, "checkstyle", &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Format(_)));
    }

    #[tokio::test]
    async fn test_exit_code_is_decided_before_detail() {
        let report = Report::new(vec![
            Diagnostic::new("ruleX", Severity::Error, "x is bad", "a.js", 1, 1),
            Diagnostic::new("ruleX", Severity::Error, "x is bad again", "a.js", 4, 2),
            Diagnostic::new("ruleY", Severity::Warning, "y is iffy", "b.js", 2, 8),
        ]);
        let (decision, _, _) = run(report);
        // Phase 1 is over: the exit code is known while no input exists yet.
        assert_eq!(decision.exit_code, 0);

        let (tx, mut rx) = mpsc::channel(1);
        tx.send("ruleX".to_string()).await.unwrap();
        let mut out = Vec::new();
        let detail = decision
            .drill_down
            .expect("pending drill-down")
            .resolve(&mut rx, &mut out)
            .await
            .unwrap();
        assert_eq!(
            detail,
            Some(DetailOutcome {
                rule: "ruleX".into(),
                matches: 2
            })
        );
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("x is bad again"));
        assert!(!text.contains("y is iffy"));
        assert_eq!(decision.exit_code, 0);
    }
}
