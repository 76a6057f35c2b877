use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};

use crate::merge::config::{MergeConfig, DEFAULT_SUMMARY_THRESHOLD};
use crate::merge::loader::DEFAULT_EXCLUDE_PATTERNS;
use crate::merge::similarity::DEFAULT_DEDUPE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Serve the HTTP API.
    Serve,
    /// Merge `INPUT_DIR` into `OUTPUT_DIR/master_resume.json` once and exit.
    Batch,
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub run_mode: RunMode,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub exclude_patterns: Vec<String>,
    pub dedupe_threshold: f64,
    pub summary_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            run_mode: RunMode::Serve,
            input_dir: PathBuf::from("./out_resume_json"),
            output_dir: PathBuf::from("./out_resume_json"),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            dedupe_threshold: DEFAULT_DEDUPE_THRESHOLD,
            summary_threshold: DEFAULT_SUMMARY_THRESHOLD,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: optional_env("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            run_mode: optional_env("RUN_MODE")
                .map(|v| parse_run_mode(&v))
                .transpose()?
                .unwrap_or(defaults.run_mode),
            input_dir: optional_env("INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: optional_env("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            exclude_patterns: optional_env("EXCLUDE_PATTERNS")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.exclude_patterns),
            dedupe_threshold: optional_env("DEDUPE_THRESHOLD")
                .map(|v| parse_threshold("DEDUPE_THRESHOLD", &v))
                .transpose()?
                .unwrap_or(defaults.dedupe_threshold),
            summary_threshold: optional_env("SUMMARY_THRESHOLD")
                .map(|v| parse_threshold("SUMMARY_THRESHOLD", &v))
                .transpose()?
                .unwrap_or(defaults.summary_threshold),
        })
    }

    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig::with_thresholds(self.dedupe_threshold, self.summary_threshold)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_run_mode(raw: &str) -> Result<RunMode> {
    match raw.trim().to_lowercase().as_str() {
        "serve" => Ok(RunMode::Serve),
        "batch" => Ok(RunMode::Batch),
        other => bail!("RUN_MODE must be 'serve' or 'batch', got '{other}'"),
    }
}

fn parse_threshold(key: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a number"))?;
    ensure!(
        (0.0..=1.0).contains(&value),
        "{key} must be between 0 and 1, got {value}"
    );
    Ok(value)
}

/// Comma-separated list, blanks dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_mode() {
        assert_eq!(parse_run_mode("serve").unwrap(), RunMode::Serve);
        assert_eq!(parse_run_mode(" Batch ").unwrap(), RunMode::Batch);
        assert!(parse_run_mode("daemon").is_err());
    }

    #[test]
    fn test_parse_threshold_bounds() {
        assert_eq!(parse_threshold("T", "0.9").unwrap(), 0.9);
        assert!(parse_threshold("T", "1.5").is_err());
        assert!(parse_threshold("T", "high").is_err());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(r"^master.*\.json$, ,^backup.*"),
            vec![r"^master.*\.json$".to_string(), "^backup.*".to_string()]
        );
    }

    #[test]
    fn test_merge_config_carries_thresholds() {
        let config = Config {
            dedupe_threshold: 0.8,
            ..Config::default()
        };
        let merge = config.merge_config();
        assert_eq!(merge.dedupe_threshold, 0.8);
        assert_eq!(merge.summary_threshold, 0.98);
    }
}
