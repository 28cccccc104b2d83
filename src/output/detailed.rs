//! `detailed`: every field of every record, one block per record.

use super::{severity_label, Formatter};
use crate::models::ReportView;
use crate::utils::paint;
use owo_colors::OwoColorize;

pub struct Detailed {
    pub color: bool,
}

impl Formatter for Detailed {
    fn render(&self, view: &ReportView<'_>) -> String {
        let blocks: Vec<String> = view
            .iter()
            .map(|d| {
                let head = format!(
                    "{} {}  {}",
                    severity_label(d.severity, self.color),
                    paint(self.color, &d.rule_id, |s| s.dimmed().to_string()),
                    d.message
                );
                format!(
                    "{head}\n    file:   {}\n    line:   {}\n    column: {}",
                    d.file_path, d.line, d.column
                )
            })
            .collect();
        blocks.join("\n\n")
    }
}
