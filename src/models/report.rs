//! Diagnostics report and read-only filtered views over it.
//!
//! A `Report` is built once per run from the engine's records and is never
//! mutated afterwards. Its counters are computed at construction so they
//! always agree with the records: fatal records count toward neither
//! `error_count` nor `warning_count`.

use super::{Diagnostic, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Ordered diagnostics for one run plus derived counters.
pub struct Report {
    records: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl Report {
    pub fn new(records: Vec<Diagnostic>) -> Self {
        let error_count = count(records.iter(), Severity::Error);
        let warning_count = count(records.iter(), Severity::Warning);
        Self {
            records,
            error_count,
            warning_count,
        }
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// View over every record of the report.
    pub fn view(&self) -> ReportView<'_> {
        ReportView {
            records: self.records.iter().collect(),
        }
    }

    /// Records of fatal severity, in report order. May be empty.
    pub fn fatal_subset(&self) -> ReportView<'_> {
        self.select(|d| d.severity.is_fatal())
    }

    /// Records whose rule id equals `rule` exactly (case-sensitive).
    pub fn filter_by_rule(&self, rule: &str) -> ReportView<'_> {
        self.select(|d| d.rule_id == rule)
    }

    fn select(&self, keep: impl Fn(&Diagnostic) -> bool) -> ReportView<'_> {
        ReportView {
            records: self.records.iter().filter(|d| keep(d)).collect(),
        }
    }
}

#[derive(Debug, Clone)]
/// Read-only, order-preserving view over some records of a `Report`.
///
/// Formatters render views, so a whole report and any subset of it go
/// through the same code path.
pub struct ReportView<'a> {
    records: Vec<&'a Diagnostic>,
}

impl<'a> ReportView<'a> {
    pub fn records(&self) -> &[&'a Diagnostic] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Diagnostic> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn error_count(&self) -> usize {
        count(self.iter(), Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        count(self.iter(), Severity::Warning)
    }

    pub fn fatal_count(&self) -> usize {
        count(self.iter(), Severity::Fatal)
    }

    /// Number of distinct files referenced by the view.
    pub fn file_count(&self) -> usize {
        let files: std::collections::BTreeSet<&str> =
            self.iter().map(|d| d.file_path.as_str()).collect();
        files.len()
    }
}

fn count<'a>(records: impl Iterator<Item = &'a Diagnostic>, severity: Severity) -> usize {
    records.filter(|d| d.severity == severity).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn severity_strategy() -> impl Strategy<Value = Severity> {
        prop_oneof![
            Just(Severity::Warning),
            Just(Severity::Error),
            Just(Severity::Fatal),
        ]
    }

    fn rec(rule: &str, severity: Severity) -> Diagnostic {
        Diagnostic::new(rule, severity, format!("{rule} message"), "src/app.js", 1, 1)
    }

    #[test]
    fn test_counters_match_records_and_skip_fatal() {
        let report = Report::new(vec![
            rec("semi", Severity::Error),
            rec("quotes", Severity::Warning),
            rec("semi", Severity::Error),
            rec("load-config", Severity::Fatal),
            rec("quotes", Severity::Warning),
            rec("eqeqeq", Severity::Warning),
        ]);
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 3);
        assert_eq!(report.view().fatal_count(), 1);
        assert_eq!(report.records().len(), 6);
    }

    #[test]
    fn test_empty_report_has_zero_counts() {
        let report = Report::new(Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 0);
        assert!(report.fatal_subset().is_empty());
    }

    #[test]
    fn test_filter_by_rule_is_exact_and_case_sensitive() {
        let mut records: Vec<Diagnostic> = (0..8).map(|_| rec("semi", Severity::Error)).collect();
        records.insert(2, rec("no-unused-vars", Severity::Warning));
        records.push(rec("no-unused-vars", Severity::Error));
        let report = Report::new(records);

        let hit = report.filter_by_rule("no-unused-vars");
        assert_eq!(hit.len(), 2);
        assert!(hit.iter().all(|d| d.rule_id == "no-unused-vars"));
        assert!(report.filter_by_rule("No-Unused-Vars").is_empty());
        assert!(report.filter_by_rule("no-unused").is_empty());
        assert!(report.filter_by_rule("nonexistent").is_empty());
    }

    #[test]
    fn test_fatal_subset_preserves_order() {
        let mut a = rec("read-file", Severity::Fatal);
        a.file_path = "a.js".into();
        let mut b = rec("read-file", Severity::Fatal);
        b.file_path = "b.js".into();
        let report = Report::new(vec![
            a.clone(),
            rec("semi", Severity::Error),
            b.clone(),
        ]);
        let fatal = report.fatal_subset();
        let got: Vec<&Diagnostic> = fatal.iter().collect();
        assert_eq!(got, vec![&a, &b]);
    }

    #[test]
    fn test_file_count_is_distinct() {
        let mut other = rec("semi", Severity::Error);
        other.file_path = "lib/util.js".into();
        let report = Report::new(vec![
            rec("semi", Severity::Error),
            rec("quotes", Severity::Warning),
            other,
        ]);
        assert_eq!(report.view().file_count(), 2);
    }

    proptest! {
        /// Counters equal the number of records of each severity; fatal
        /// records never count.
        #[test]
        fn counters_match_any_severity_mix(
            severities in prop::collection::vec(severity_strategy(), 0..64)
        ) {
            let records: Vec<Diagnostic> = severities
                .iter()
                .map(|s| rec("rule", *s))
                .collect();
            let report = Report::new(records);
            let errors = severities.iter().filter(|s| **s == Severity::Error).count();
            let warnings = severities.iter().filter(|s| **s == Severity::Warning).count();
            let fatal = severities.len() - errors - warnings;
            prop_assert_eq!(report.error_count(), errors);
            prop_assert_eq!(report.warning_count(), warnings);
            prop_assert_eq!(report.fatal_subset().len(), fatal);
            prop_assert_eq!(report.view().error_count(), errors);
        }
    }
}
