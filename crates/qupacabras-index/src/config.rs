//! Configuration for validation and index runs.
//!
//! Supports loading configuration from:
//! 1. A YAML configuration file
//! 2. Environment variables (with `QUPACABRAS_` prefix)
//!
//! Precedence (highest to lowest): command-line flags applied by the caller,
//! environment variables, configuration file, default values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "qupacabras.yaml";

/// Index pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding one folder per submission.
    pub submissions_dir: PathBuf,

    /// Where the merged index is written.
    pub output_file: PathBuf,

    /// Name of the record file inside each submission folder.
    pub benchmark_file: String,

    /// Folder names that are never treated as submissions.
    pub excluded_folders: Vec<String>,

    /// Metric values closer than this count as duplicates.
    pub duplicate_tolerance: f64,

    /// Accept submissions without `id`/`timestamp` and fill them in.
    pub allow_unstamped: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            submissions_dir: PathBuf::from("submissions"),
            output_file: PathBuf::from("public/benchmarks.json"),
            benchmark_file: "benchmark.json".to_string(),
            excluded_folders: vec!["template".to_string()],
            duplicate_tolerance: 1e-4,
            allow_unstamped: false,
        }
    }
}

impl IndexConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        let config: IndexConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from `config_file` if provided, else from
    ///    [`DEFAULT_CONFIG_FILE`] if it exists, else defaults
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `QUPACABRAS_*` overrides from a variable lookup.
    ///
    /// Only variables that are set override the current values. Unparseable
    /// booleans are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("QUPACABRAS_SUBMISSIONS_DIR") {
            self.submissions_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("QUPACABRAS_OUTPUT_FILE") {
            self.output_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("QUPACABRAS_ALLOW_UNSTAMPED") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.allow_unstamped = true,
                "0" | "false" | "no" | "off" => self.allow_unstamped = false,
                _ => {}
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.benchmark_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "benchmark_file must not be empty".to_string(),
            ));
        }

        if !self.duplicate_tolerance.is_finite() || self.duplicate_tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "duplicate_tolerance must be a positive number, got {}",
                self.duplicate_tolerance
            )));
        }

        Ok(())
    }

    /// Whether `folder` is a reserved, non-submission folder.
    pub fn is_excluded(&self, folder: &str) -> bool {
        self.excluded_folders.iter().any(|f| f == folder)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.submissions_dir, PathBuf::from("submissions"));
        assert_eq!(config.output_file, PathBuf::from("public/benchmarks.json"));
        assert!(config.is_excluded("template"));
        assert!(!config.allow_unstamped);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_tolerance() {
        let mut config = IndexConfig::default();
        config.duplicate_tolerance = 0.0;
        assert!(config.validate().is_err());
        config.duplicate_tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_benchmark_file() {
        let mut config = IndexConfig::default();
        config.benchmark_file = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qupacabras.yaml");
        std::fs::write(
            &path,
            "submissions_dir: data/subs\nexcluded_folders: [template, drafts]\n",
        )
        .unwrap();

        let config = IndexConfig::from_file(&path).unwrap();
        assert_eq!(config.submissions_dir, PathBuf::from("data/subs"));
        assert!(config.is_excluded("drafts"));
        assert_eq!(config.benchmark_file, "benchmark.json");
    }

    #[test]
    fn test_from_file_rejects_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "duplicate_tolerance: [not, a, number]\n").unwrap();
        assert!(matches!(
            IndexConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            IndexConfig::from_file(dir.path().join("missing.yaml")),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("QUPACABRAS_OUTPUT_FILE", "dist/index.json"),
            ("QUPACABRAS_ALLOW_UNSTAMPED", "true"),
        ]);
        let mut config = IndexConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.output_file, PathBuf::from("dist/index.json"));
        assert_eq!(config.submissions_dir, PathBuf::from("submissions"));
        assert!(config.allow_unstamped);
    }

    #[test]
    fn test_env_override_ignores_garbage_bool() {
        let mut config = IndexConfig::default();
        config.apply_env_overrides(|key| {
            (key == "QUPACABRAS_ALLOW_UNSTAMPED").then(|| "maybe".to_string())
        });
        assert!(!config.allow_unstamped);
    }
}
