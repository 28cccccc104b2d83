//! Configuration discovery and loading.
//!
//! Nibbler reads `nibbler.toml|yaml|yml` from the working directory (or the
//! closest ancestor, stopping at a `.git` directory), or from the path given
//! with `--config`. Keys:
//! - `extensions`: file extensions to lint (default: `["js"]`)
//! - `[rules.<id>]`: `level` (off|warn|error, or 0|1|2), optional `pattern`
//!   (regex rule), `message`, and `max` (for `max-len`)
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILES: [&str; 3] = ["nibbler.toml", "nibbler.yaml", "nibbler.yml"];
pub const DEFAULT_EXTENSIONS: [&str; 1] = ["js"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `nibbler.toml|yaml`.
pub struct NibblerConfig {
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleCfg>, // [rules.<id>]
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-rule settings under `[rules.<id>]`.
pub struct RuleCfg {
    #[serde(default, deserialize_with = "level_repr")]
    pub level: Option<String>,
    pub pattern: Option<String>,
    pub message: Option<String>,
    pub max: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    /// Parse `off|warn|warning|error` or the numeric forms `0|1|2`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Some(RuleLevel::Off),
            "warn" | "warning" | "1" => Some(RuleLevel::Warn),
            "error" | "2" => Some(RuleLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file {} is not valid TOML: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config file {} is not valid YAML: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// Rule id used when this error is surfaced as a diagnostic.
    pub fn rule_id(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) | ConfigError::Read { .. } => "load-config",
            ConfigError::Toml { .. } | ConfigError::Yaml { .. } => "parse-config",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigError::NotFound(path) => path,
            ConfigError::Read { path, .. }
            | ConfigError::Toml { path, .. }
            | ConfigError::Yaml { path, .. } => path,
        }
    }
}

/// Walk upward from `start` to the project root.
///
/// Stops when a nibbler config file or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Locate the config file that applies to `start`, if any.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let root = detect_root(start);
    CONFIG_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.is_file())
}

/// Load a config file; YAML when the extension says so, TOML otherwise.
pub fn load_config(path: &Path) -> Result<NibblerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve the extension list: CLI values, then config, then defaults.
///
/// Each value may hold a comma-separated list; leading dots are dropped.
pub fn resolve_extensions(cli: &[String], cfg: &NibblerConfig) -> Vec<String> {
    let from_cli = normalize_extensions(cli);
    if !from_cli.is_empty() {
        return from_cli;
    }
    let from_cfg = normalize_extensions(cfg.extensions.as_deref().unwrap_or_default());
    if !from_cfg.is_empty() {
        return from_cfg;
    }
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn normalize_extensions(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tok in values.iter().flat_map(|v| v.split(',')) {
        let ext = tok.trim().trim_start_matches('.');
        if !ext.is_empty() && !out.iter().any(|e| e == ext) {
            out.push(ext.to_string());
        }
    }
    out
}

/// Accept levels written as strings or as integers (`level = 2`).
fn level_repr<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Num(i64),
    }
    Ok(Option::<Repr>::deserialize(de)?.map(|r| match r {
        Repr::Text(s) => s,
        Repr::Num(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_discover_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("nibbler.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
extensions = [".js", "jsx"]
[rules.no-console]
level = "warn"
pattern = 'console\.log'
message = "Unexpected console statement"
[rules.max-len]
level = 2
max = 80
    "#
        )
        .unwrap();

        let nested = root.join("src/lib");
        fs::create_dir_all(&nested).unwrap();
        let path = discover_config(&nested).expect("config discovered from subdir");
        assert_eq!(path, root.join("nibbler.toml"));

        let cfg = load_config(&path).unwrap();
        assert_eq!(resolve_extensions(&[], &cfg), vec!["js", "jsx"]);
        let rule = &cfg.rules["no-console"];
        assert_eq!(rule.pattern.as_deref(), Some(r"console\.log"));
        assert_eq!(rule.level.as_deref().and_then(RuleLevel::parse), Some(RuleLevel::Warn));
        let max_len = &cfg.rules["max-len"];
        assert_eq!(max_len.level.as_deref(), Some("2"));
        assert_eq!(max_len.max, Some(80));
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nibbler.yml");
        fs::write(
            &path,
            "extensions:\n  - ts\nrules:\n  no-tabs:\n    level: error\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.extensions, Some(vec!["ts".to_string()]));
        assert_eq!(cfg.rules["no-tabs"].level.as_deref(), Some("error"));
    }

    #[test]
    fn test_discovery_stops_at_git_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("pkg")).unwrap();
        assert_eq!(detect_root(&root.join("pkg")), root.to_path_buf());
        assert!(discover_config(&root.join("pkg")).is_none());
    }

    #[test]
    fn test_load_errors_carry_rule_ids() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(&missing).unwrap_err();
        assert_eq!(err.rule_id(), "load-config");
        assert_eq!(err.path(), missing.as_path());

        let broken = dir.path().join("nibbler.toml");
        fs::write(&broken, "extensions = [").unwrap();
        let err = load_config(&broken).unwrap_err();
        assert_eq!(err.rule_id(), "parse-config");
        assert!(err.to_string().contains("not valid TOML"));
    }

    #[test]
    fn test_cli_extensions_take_precedence() {
        let cfg = NibblerConfig {
            extensions: Some(vec!["ts".into()]),
            ..Default::default()
        };
        let cli = vec![".js,.jsx".to_string(), "mjs".to_string(), "js".to_string()];
        assert_eq!(resolve_extensions(&cli, &cfg), vec!["js", "jsx", "mjs"]);
        assert_eq!(resolve_extensions(&[], &cfg), vec!["ts"]);
        assert_eq!(resolve_extensions(&[], &NibblerConfig::default()), vec!["js"]);
    }

    #[test]
    fn test_rule_level_parse() {
        assert_eq!(RuleLevel::parse("OFF"), Some(RuleLevel::Off));
        assert_eq!(RuleLevel::parse("1"), Some(RuleLevel::Warn));
        assert_eq!(RuleLevel::parse("warning"), Some(RuleLevel::Warn));
        assert_eq!(RuleLevel::parse("error"), Some(RuleLevel::Error));
        assert_eq!(RuleLevel::parse("loud"), None);
    }
}
