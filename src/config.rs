// Reporter configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reporter configuration.
///
/// Constructed per call and passed by value; there is no shared mutable
/// default to bleed state across suites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Destination directory for report files
    #[serde(default = "default_folder")]
    pub folder: PathBuf,

    /// Probe the host and attach a system fingerprint to each report
    #[serde(default)]
    pub fingerprint: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            fingerprint: false,
        }
    }
}

fn default_folder() -> PathBuf {
    PathBuf::from("benchmarks")
}

impl ReporterConfig {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .benchreporterrc.toml (current directory)
        // 2. ~/.benchreporterrc.toml (home directory)

        let cwd = std::env::current_dir().ok()?;
        let home = dirs::home_dir()?;

        let paths = [
            cwd.join(".benchreporterrc.toml"),
            home.join(".benchreporterrc.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReporterConfig::default();
        assert_eq!(config.folder, PathBuf::from("benchmarks"));
        assert!(!config.fingerprint);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
folder = "results/perf"
fingerprint = true
"#;

        let config = ReporterConfig::parse(toml).expect("Failed to parse config");
        assert_eq!(config.folder, PathBuf::from("results/perf"));
        assert!(config.fingerprint);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = ReporterConfig::parse("").expect("Failed to parse empty config");
        assert_eq!(config.folder, PathBuf::from("benchmarks"));
        assert!(!config.fingerprint);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ReporterConfig {
            folder: PathBuf::from("out"),
            fingerprint: true,
        };
        let parsed = ReporterConfig::parse(&config.to_toml()).expect("round trip");
        assert_eq!(parsed.folder, config.folder);
        assert_eq!(parsed.fingerprint, config.fingerprint);
    }
}
