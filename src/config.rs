use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration, loaded once from a JSON file before the run.
///
/// ```json
/// {
///   "static_file": "static.txt",
///   "dynamic_file": "dynamic.txt",
///   "max_events": 5000
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the static input file (particle count, box side, radius/mass).
    pub static_file: PathBuf,
    /// Path to the dynamic input file (initial time, x y vx vy rows). State
    /// records are appended to this same file as the run progresses.
    pub dynamic_file: PathBuf,
    /// Maximum number of resolved events before the run stops (> 0).
    pub max_events: u64,
}

impl Config {
    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|_| Error::Config(format!("config file {} not found", path.display())))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).map_err(|e| {
            Error::Config(format!(
                "must define \"static_file\", \"dynamic_file\" and \"max_events\": {e}"
            ))
        })?;
        if config.max_events == 0 {
            return Err(Error::Config(
                "max_events must be a positive number (max_events > 0)".into(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_config() -> Result<()> {
        let config = Config::from_json(
            r#"{"static_file": "s.txt", "dynamic_file": "d.txt", "max_events": 100}"#,
        )?;
        assert_eq!(config.static_file, PathBuf::from("s.txt"));
        assert_eq!(config.dynamic_file, PathBuf::from("d.txt"));
        assert_eq!(config.max_events, 100);
        Ok(())
    }

    #[test]
    fn rejects_missing_key() {
        let err =
            Config::from_json(r#"{"static_file": "s.txt", "max_events": 100}"#).unwrap_err();
        assert!(err.to_string().contains("dynamic_file"));
    }

    #[test]
    fn rejects_zero_or_negative_budget() {
        let err = Config::from_json(
            r#"{"static_file": "s", "dynamic_file": "d", "max_events": 0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("positive"));

        // Negative numbers do not deserialize into an unsigned budget.
        assert!(Config::from_json(
            r#"{"static_file": "s", "dynamic_file": "d", "max_events": -5}"#
        )
        .is_err());
    }

    #[test]
    fn rejects_non_numeric_budget() {
        assert!(Config::from_json(
            r#"{"static_file": "s", "dynamic_file": "d", "max_events": "many"}"#
        )
        .is_err());
    }
}
