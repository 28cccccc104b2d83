//! `summary`: findings grouped by rule, most frequent first.

use super::Formatter;
use crate::models::ReportView;
use crate::utils::paint;
use owo_colors::OwoColorize;
use std::collections::HashMap;

pub struct Summary {
    pub color: bool,
}

/// Record counts per rule id, ordered by descending count and then by
/// ascending rule id.
pub fn rule_counts<'a>(view: &ReportView<'a>) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for d in view.iter() {
        *counts.entry(d.rule_id.as_str()).or_insert(0) += 1;
    }
    let mut ordered: Vec<(&'a str, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ordered
}

impl Formatter for Summary {
    fn render(&self, view: &ReportView<'_>) -> String {
        let groups = rule_counts(view);
        let width = groups.iter().map(|(r, _)| r.chars().count()).max().unwrap_or(0);
        let mut out = paint(self.color, "Rules violated", |s| s.bold().to_string());
        for (rule, n) in groups {
            out.push('\n');
            let rule = format!("{rule:<width$}");
            out.push_str(&format!(
                "  {}  {}",
                paint(self.color, &rule, |s| s.cyan().to_string()),
                n
            ));
        }
        out
    }
}
