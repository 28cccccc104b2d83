//! `stylish`: diagnostics grouped by file, one per line, plus a footer.

use super::{plural, severity_label, Formatter};
use crate::models::{Diagnostic, ReportView};
use crate::utils::paint;
use owo_colors::OwoColorize;

pub struct Stylish {
    pub color: bool,
}

impl Formatter for Stylish {
    fn render(&self, view: &ReportView<'_>) -> String {
        if view.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for (file, records) in group_by_file(view) {
            out.push_str(&paint(self.color, file, |s| s.underline().to_string()));
            out.push('\n');
            let positions: Vec<String> = records
                .iter()
                .map(|d| format!("{}:{}", d.line, d.column))
                .collect();
            let pos_w = positions.iter().map(String::len).max().unwrap_or(0);
            let sev_w = records
                .iter()
                .map(|d| d.severity.to_string().len())
                .max()
                .unwrap_or(0);
            let msg_w = records
                .iter()
                .map(|d| d.message.chars().count())
                .max()
                .unwrap_or(0);
            for (d, pos) in records.iter().zip(&positions) {
                // Pad on plain text so escape codes do not skew columns.
                let sev_pad = " ".repeat(sev_w - d.severity.to_string().len());
                let pos = paint(self.color, &format!("{pos:<pos_w$}"), |s| {
                    s.dimmed().to_string()
                });
                let rule = paint(self.color, &d.rule_id, |s| s.dimmed().to_string());
                out.push_str(&format!(
                    "  {}  {}{}  {:<msg_w$}  {}\n",
                    pos,
                    severity_label(d.severity, self.color),
                    sev_pad,
                    d.message,
                    rule
                ));
            }
            out.push('\n');
        }
        out.push_str(&self.footer(view));
        out
    }
}

impl Stylish {
    fn footer(&self, view: &ReportView<'_>) -> String {
        let mut parts = vec![
            plural(view.error_count(), "error"),
            plural(view.warning_count(), "warning"),
        ];
        let fatal = view.fatal_count();
        if fatal > 0 {
            parts.push(format!("{fatal} fatal"));
        }
        let line = format!(
            "\u{2716} {} ({})",
            plural(view.len(), "problem"),
            parts.join(", ")
        );
        let severe = view.error_count() > 0 || fatal > 0;
        paint(self.color, &line, |s| {
            if severe {
                s.red().bold().to_string()
            } else {
                s.yellow().bold().to_string()
            }
        })
    }
}

/// Group records by file, keeping first-seen file order and record order.
fn group_by_file<'a>(view: &ReportView<'a>) -> Vec<(&'a str, Vec<&'a Diagnostic>)> {
    let mut groups: Vec<(&'a str, Vec<&'a Diagnostic>)> = Vec::new();
    for d in view.iter() {
        match groups.iter_mut().find(|(f, _)| *f == d.file_path) {
            Some((_, list)) => list.push(d),
            None => groups.push((d.file_path.as_str(), vec![d])),
        }
    }
    groups
}
