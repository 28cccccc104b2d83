//! `json`: records and counters as a pretty JSON document.

use super::Formatter;
use crate::models::ReportView;
use serde_json::json;
use serde_json::Value as JsonVal;

pub struct Json;

/// Compose the JSON document (pure) so callers can inspect its shape.
pub fn compose_report_json(view: &ReportView<'_>) -> JsonVal {
    let results: Vec<JsonVal> = view
        .iter()
        .map(|d| serde_json::to_value(d).unwrap_or(JsonVal::Null))
        .collect();
    let summary = json!({
        "errors": view.error_count(),
        "warnings": view.warning_count(),
        "fatal": view.fatal_count(),
        "files": view.file_count(),
    });
    json!({"results": results, "summary": summary})
}

impl Formatter for Json {
    fn render(&self, view: &ReportView<'_>) -> String {
        format!("{:#}", compose_report_json(view))
    }
}
