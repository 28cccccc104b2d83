//! `stats`: aggregate totals per severity.

use super::Formatter;
use crate::models::ReportView;
use crate::utils::paint;
use owo_colors::OwoColorize;

pub struct Stats {
    pub color: bool,
}

impl Formatter for Stats {
    fn render(&self, view: &ReportView<'_>) -> String {
        let errors = view.error_count();
        let warnings = view.warning_count();
        let mut out = paint(self.color, "Lint statistics", |s| s.bold().to_string());
        out.push('\n');
        out.push_str(&format!(
            "  Errors:   {}\n",
            paint(self.color && errors > 0, &errors.to_string(), |s| s.red().to_string())
        ));
        out.push_str(&format!(
            "  Warnings: {}\n",
            paint(self.color && warnings > 0, &warnings.to_string(), |s| {
                s.yellow().to_string()
            })
        ));
        out.push_str(&format!("  Files:    {}", view.file_count()));
        out
    }
}
