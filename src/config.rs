//! Configuration module for pinglog.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::analysis::DEFAULT_THRESHOLD;

/// Analyzer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Consecutive failures that count as a disconnection (default: 3)
    pub disconnect_threshold: usize,
    /// Where the text report is copied (default: "analysis_result.log")
    pub log_path: PathBuf,
    /// Directory for the chart and JSON files (default: ".")
    pub output_dir: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            disconnect_threshold: DEFAULT_THRESHOLD,
            log_path: PathBuf::from("analysis_result.log"),
            output_dir: PathBuf::from("."),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PINGLOG_THRESHOLD`: disconnection threshold (default: 3)
    /// - `PINGLOG_LOG_PATH`: report log file (default: "analysis_result.log")
    /// - `PINGLOG_OUTPUT_DIR`: chart/JSON output directory (default: ".")
    pub fn load() -> Self {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(threshold) = lookup("PINGLOG_THRESHOLD") {
            cfg.apply_threshold(&threshold);
        }

        if let Some(log_path) = lookup("PINGLOG_LOG_PATH") {
            cfg.log_path = PathBuf::from(log_path);
        }

        if let Some(output_dir) = lookup("PINGLOG_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(output_dir);
        }

        cfg
    }

    /// Override the threshold from user input. Blank, non-numeric and zero
    /// values leave the current threshold in place.
    pub fn apply_threshold(&mut self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() {
            return false;
        }

        match input.parse::<usize>() {
            Ok(threshold) if threshold > 0 => {
                self.disconnect_threshold = threshold;
                true
            }
            _ => {
                tracing::warn!(
                    "Ignoring invalid threshold {:?}, keeping {}",
                    input,
                    self.disconnect_threshold
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.disconnect_threshold, 3);
        assert_eq!(cfg.log_path, PathBuf::from("analysis_result.log"));
        assert_eq!(cfg.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_from_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PINGLOG_THRESHOLD", "7"),
            ("PINGLOG_LOG_PATH", "/tmp/ping.log"),
            ("PINGLOG_OUTPUT_DIR", "reports"),
        ]
        .into_iter()
        .collect();

        let cfg = AnalyzerConfig::load_from(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.disconnect_threshold, 7);
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/ping.log"));
        assert_eq!(cfg.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_load_from_ignores_bad_threshold() {
        let cfg = AnalyzerConfig::load_from(|key| {
            (key == "PINGLOG_THRESHOLD").then(|| "zero".to_string())
        });
        assert_eq!(cfg.disconnect_threshold, 3);
        assert_eq!(cfg.log_path, PathBuf::from("analysis_result.log"));
    }

    #[test]
    fn test_apply_threshold() {
        let mut cfg = AnalyzerConfig::default();

        assert!(cfg.apply_threshold(" 5 "));
        assert_eq!(cfg.disconnect_threshold, 5);

        assert!(!cfg.apply_threshold(""));
        assert!(!cfg.apply_threshold("abc"));
        assert!(!cfg.apply_threshold("0"));
        assert!(!cfg.apply_threshold("-2"));
        assert_eq!(cfg.disconnect_threshold, 5);
    }
}
