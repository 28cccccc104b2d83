//! Interactive drill-down: one prompt, one rule name, one detail rendering.
//!
//! This is the second phase of a run. The pipeline has already decided the
//! exit code when a `DrillDown` is handed out; resolving it only produces
//! more output. Input arrives over an mpsc channel so the wait is an
//! ordinary `await` on the runtime, fed by a separate reader task.

use crate::models::Report;
use crate::output::{FormatError, FormatterRegistry, DETAILED};
use crate::pipeline::Stage;
use crate::utils::paint;
use owo_colors::OwoColorize;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

pub const RULE_PROMPT: &str = "Type in the rule you want to focus on";

#[derive(Debug, Error)]
pub enum DrillDownError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a resolved drill-down rendered.
pub struct DetailOutcome {
    pub rule: String,
    pub matches: usize,
}

/// Pending per-rule detail for a report that had findings.
pub struct DrillDown {
    report: Report,
    registry: Arc<FormatterRegistry>,
    color: bool,
}

impl DrillDown {
    pub fn new(report: Report, registry: Arc<FormatterRegistry>, color: bool) -> Self {
        Self {
            report,
            registry,
            color,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "{} {} ",
            paint(self.color, "?", |s| s.green().to_string()),
            paint(self.color, RULE_PROMPT, |s| s.bold().to_string())
        )
    }

    /// Detail text for the records of `rule`. Empty when nothing matches.
    pub fn render(&self, rule: &str) -> Result<String, FormatError> {
        self.registry
            .format_report(&self.report.filter_by_rule(rule), DETAILED)
    }

    /// Prompt on `out`, wait for one line on `input`, then render its detail.
    ///
    /// Returns `Ok(None)` when the input channel closes before a line
    /// arrives. There is no timeout.
    pub async fn resolve<O: Write>(
        self,
        input: &mut mpsc::Receiver<String>,
        out: &mut O,
    ) -> Result<Option<DetailOutcome>, DrillDownError> {
        write!(out, "{}", self.prompt())?;
        out.flush()?;
        let Some(line) = input.recv().await else {
            tracing::debug!("input closed before a rule was given");
            return Ok(None);
        };
        let rule = line.trim_end_matches(['\r', '\n']).to_string();
        let matches = self.report.filter_by_rule(&rule).len();
        tracing::debug!(stage = ?Stage::Detail, rule = %rule, matches, "pipeline stage");
        let detail = self.render(&rule)?;
        if !detail.is_empty() {
            writeln!(out, "{detail}")?;
        }
        Ok(Some(DetailOutcome { rule, matches }))
    }
}

/// Spawn a task that forwards each line of `reader` into a channel.
///
/// The task stops at end of input or once the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read input");
                    break;
                }
            }
        }
    });
    rx
}
