//! Hook configuration (YAML/Env loading)
//!
//! Three layers, later ones winning:
//! - Defaults: hook enabled, nothing skipped
//! - YAML document (`version: 1`)
//! - Environment (`RUSTIMPORT_HOOK_DISABLE`, `RUSTIMPORT_HOOK_SKIP`)
//!
//! # Examples
//!
//! ```rust
//! use rustimport_hook::config::HookConfig;
//!
//! let config = HookConfig::from_yaml_str(
//!     "version: 1\nskip_packages: [numpy, pandas]\n",
//! ).unwrap();
//! assert!(config.enabled);
//! assert!(config.skips("numpy"));
//! ```

pub mod error;

use serde::{Deserialize, Serialize};

use crate::domain::module_name::is_identifier;

pub use error::{ConfigError, ConfigResult};

/// Disables installation when set to a truthy value.
pub const ENV_DISABLE: &str = "RUSTIMPORT_HOOK_DISABLE";
/// Comma-separated top-level packages the Finder never delegates for.
pub const ENV_SKIP: &str = "RUSTIMPORT_HOOK_SKIP";

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Runtime settings for the registrar and the Finder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookConfig {
    /// Whether `HookRegistrar::install` splices the Finder in at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Top-level packages answered with "no opinion" without delegating
    #[serde(default)]
    pub skip_packages: Vec<String>,

    /// Include the full error chain in the suppressed not-found debug log
    #[serde(default = "default_true")]
    pub log_error_chain: bool,
}

fn default_true() -> bool {
    true
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_packages: Vec::new(),
            log_error_chain: true,
        }
    }
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    /// Optional on the wire so a missing field gets a precise error
    version: Option<u32>,

    #[serde(default = "default_true")]
    enabled: bool,

    #[serde(default)]
    skip_packages: Vec<String>,

    #[serde(default = "default_true")]
    log_error_chain: bool,
}

impl From<ConfigFileV1> for HookConfig {
    fn from(file: ConfigFileV1) -> Self {
        Self {
            enabled: file.enabled,
            skip_packages: file.skip_packages,
            log_error_chain: file.log_error_chain,
        }
    }
}

impl HookConfig {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(v) if !SUPPORTED_VERSIONS.contains(&v) => {
                return Err(ConfigError::UnsupportedVersion {
                    found: v,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }

        let config = HookConfig::from(file);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(SUPPORTED_VERSIONS[0]),
            enabled: self.enabled,
            skip_packages: self.skip_packages.clone(),
            log_error_chain: self.log_error_chain,
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Defaults with the process environment applied.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DISABLE) {
            self.enabled = !parse_flag(ENV_DISABLE, &value)?;
        }

        if let Some(value) = lookup(ENV_SKIP) {
            for entry in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if !self.skip_packages.iter().any(|p| p == entry) {
                    self.skip_packages.push(entry.to_string());
                }
            }
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for entry in &self.skip_packages {
            if entry.contains('.') {
                return Err(ConfigError::InvalidSkipEntry {
                    entry: entry.clone(),
                    hint: "only top-level package names are matched".to_string(),
                });
            }
            if !is_identifier(entry) {
                return Err(ConfigError::InvalidSkipEntry {
                    entry: entry.clone(),
                    hint: "not a valid package identifier".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether lookups under `top_level` are skipped.
    pub fn skips(&self, top_level: &str) -> bool {
        self.skip_packages.iter().any(|p| p == top_level)
    }
}

fn parse_flag(var: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HookConfig::default();
        assert!(config.enabled);
        assert!(config.skip_packages.is_empty());
        assert!(config.log_error_chain);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = HookConfig {
            enabled: false,
            skip_packages: vec!["numpy".to_string()],
            log_error_chain: true,
        };

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("numpy"));
        assert_eq!(HookConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
enabled: true
skip_packages:
  - numpy
  - scipy
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();
        let path = temp_file.path().to_str().unwrap();

        let config = HookConfig::from_yaml(path).unwrap();
        assert!(config.skips("numpy"));
        assert!(config.skips("scipy"));
        assert!(!config.skips("fast_math"));
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = HookConfig::from_yaml_str("enabled: false\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = HookConfig::from_yaml_str("version: 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field() {
        let result = HookConfig::from_yaml_str("version: 1\nopt_in: false\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_dotted_skip_entry_rejected() {
        let result = HookConfig::from_yaml_str("version: 1\nskip_packages: [numpy.linalg]\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSkipEntry { .. })
        ));
    }

    #[test]
    fn test_env_disable() {
        let config = HookConfig::default()
            .with_env(env(&[(ENV_DISABLE, "1")]))
            .unwrap();
        assert!(!config.enabled);

        let config = HookConfig::default()
            .with_env(env(&[(ENV_DISABLE, "no")]))
            .unwrap();
        assert!(config.enabled);
    }

    #[test]
    fn test_env_disable_garbage() {
        let result = HookConfig::default().with_env(env(&[(ENV_DISABLE, "maybe")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn test_env_skip_merges_without_duplicates() {
        let base = HookConfig {
            skip_packages: vec!["numpy".to_string()],
            ..HookConfig::default()
        };
        let config = base
            .with_env(env(&[(ENV_SKIP, "numpy, pandas,,torch")]))
            .unwrap();
        assert_eq!(config.skip_packages, vec!["numpy", "pandas", "torch"]);
    }
}
