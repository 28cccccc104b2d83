//! Fatal-severity classification of a report.

use crate::models::{Report, ReportView};

/// Return the fatal records of `report`, or `None` when there are none.
///
/// The returned view is never empty and keeps report order. Callers treat
/// `Some` as a hard stop: nothing but the fatal dump is rendered.
pub fn classify_fatal(report: &Report) -> Option<ReportView<'_>> {
    let fatal = report.fatal_subset();
    if fatal.is_empty() {
        None
    } else {
        Some(fatal)
    }
}
