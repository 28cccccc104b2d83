//! Line-oriented rule checks used by the built-in engine.
//!
//! Built-in rules and their default levels:
//! - `no-trailing-spaces` (warn)
//! - `eol-last` (warn)
//! - `max-len` (off, `max` defaults to 100)
//! - `no-tabs` (off)
//!
//! A `[rules.<id>]` entry with a `pattern` defines a regex rule (default
//! level error) that reports every match.

use crate::config::{NibblerConfig, RuleLevel};
use crate::models::{Diagnostic, Severity};
use regex::Regex;

pub const DEFAULT_MAX_LEN: usize = 100;

const BUILTIN_RULES: [(&str, RuleLevel); 4] = [
    ("no-trailing-spaces", RuleLevel::Warn),
    ("eol-last", RuleLevel::Warn),
    ("max-len", RuleLevel::Off),
    ("no-tabs", RuleLevel::Off),
];

#[derive(Debug, Clone)]
pub enum RuleKind {
    TrailingSpaces,
    EolLast,
    MaxLen(usize),
    NoTabs,
    Pattern(Regex),
}

#[derive(Debug, Clone)]
/// A rule that is switched on, with its resolved severity.
pub struct ActiveRule {
    pub id: String,
    pub severity: Severity,
    pub kind: RuleKind,
    pub message: Option<String>,
}

/// Build the active rule set from configuration.
///
/// Problems with rule definitions come back as fatal diagnostics against
/// `config_path`; the offending rule is left out.
pub fn build_rules(cfg: &NibblerConfig, config_path: &str) -> (Vec<ActiveRule>, Vec<Diagnostic>) {
    let mut rules = Vec::new();
    let mut fatal = Vec::new();

    for (id, default_level) in BUILTIN_RULES {
        if cfg.rules.get(id).is_some_and(|r| r.pattern.is_some()) {
            continue;
        }
        let rc = cfg.rules.get(id);
        let level = match rc.and_then(|r| r.level.as_deref()) {
            None => default_level,
            Some(raw) => match RuleLevel::parse(raw) {
                Some(l) => l,
                None => {
                    fatal.push(bad_level(id, raw, config_path));
                    continue;
                }
            },
        };
        let Some(severity) = severity_of(level) else {
            continue;
        };
        let kind = match id {
            "no-trailing-spaces" => RuleKind::TrailingSpaces,
            "eol-last" => RuleKind::EolLast,
            "max-len" => RuleKind::MaxLen(rc.and_then(|r| r.max).unwrap_or(DEFAULT_MAX_LEN)),
            _ => RuleKind::NoTabs,
        };
        rules.push(ActiveRule {
            id: id.to_string(),
            severity,
            kind,
            message: rc.and_then(|r| r.message.clone()),
        });
    }

    for (id, rc) in &cfg.rules {
        let Some(pattern) = rc.pattern.as_deref() else {
            if !BUILTIN_RULES.iter().any(|(b, _)| b == id) {
                fatal.push(Diagnostic::fatal(
                    "unknown-rule",
                    format!("Definition for rule '{id}' was not found (no pattern given)"),
                    config_path,
                ));
            }
            continue;
        };
        let level = match rc.level.as_deref() {
            None => RuleLevel::Error,
            Some(raw) => match RuleLevel::parse(raw) {
                Some(l) => l,
                None => {
                    fatal.push(bad_level(id, raw, config_path));
                    continue;
                }
            },
        };
        let Some(severity) = severity_of(level) else {
            continue;
        };
        match Regex::new(pattern) {
            Ok(re) => rules.push(ActiveRule {
                id: id.clone(),
                severity,
                kind: RuleKind::Pattern(re),
                message: rc.message.clone(),
            }),
            Err(e) => fatal.push(Diagnostic::fatal(
                "rule-pattern",
                format!("Invalid pattern for rule '{id}': {e}"),
                config_path,
            )),
        }
    }
    (rules, fatal)
}

fn severity_of(level: RuleLevel) -> Option<Severity> {
    match level {
        RuleLevel::Off => None,
        RuleLevel::Warn => Some(Severity::Warning),
        RuleLevel::Error => Some(Severity::Error),
    }
}

fn bad_level(id: &str, raw: &str, config_path: &str) -> Diagnostic {
    Diagnostic::fatal(
        "rule-level",
        format!("Invalid level '{raw}' for rule '{id}' (expected off, warn or error)"),
        config_path,
    )
}

/// Run every rule over `text`, returning diagnostics in line order.
pub fn run_checks(rules: &[ActiveRule], text: &str, file: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        for rule in rules {
            check_line(rule, line, line_no, file, &mut out);
        }
    }
    for rule in rules {
        if matches!(rule.kind, RuleKind::EolLast) && !text.is_empty() && !text.ends_with('\n') {
            let last = text.lines().count().max(1);
            let col = text.lines().last().map_or(0, |l| l.chars().count()) + 1;
            out.push(report(
                rule,
                "Newline required at end of file but not found.".to_string(),
                file,
                last,
                col,
            ));
        }
    }
    out
}

fn check_line(rule: &ActiveRule, line: &str, line_no: usize, file: &str, out: &mut Vec<Diagnostic>) {
    match &rule.kind {
        RuleKind::TrailingSpaces => {
            let trimmed = line.trim_end_matches([' ', '\t']);
            if trimmed.len() < line.len() {
                let col = trimmed.chars().count() + 1;
                out.push(report(rule, "Trailing spaces not allowed.".into(), file, line_no, col));
            }
        }
        RuleKind::MaxLen(max) => {
            let len = line.chars().count();
            if len > *max {
                out.push(report(
                    rule,
                    format!("This line has a length of {len}. Maximum allowed is {max}."),
                    file,
                    line_no,
                    max + 1,
                ));
            }
        }
        RuleKind::NoTabs => {
            if let Some(byte) = line.find('\t') {
                let col = line[..byte].chars().count() + 1;
                out.push(report(rule, "Unexpected tab character.".into(), file, line_no, col));
            }
        }
        RuleKind::Pattern(re) => {
            for m in re.find_iter(line) {
                let col = line[..m.start()].chars().count() + 1;
                out.push(report(
                    rule,
                    format!("Unexpected match for /{}/.", re.as_str()),
                    file,
                    line_no,
                    col,
                ));
            }
        }
        RuleKind::EolLast => {}
    }
}

fn report(rule: &ActiveRule, default_message: String, file: &str, line: usize, column: usize) -> Diagnostic {
    Diagnostic::new(
        rule.id.clone(),
        rule.severity,
        rule.message.clone().unwrap_or(default_message),
        file,
        line,
        column,
    )
}
