//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into the binary)
//! 2. Config file (`harness.yaml` in the config directory, or an explicit path)
//! 3. Environment variables (`HARNESS_*` prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{FaultBackend, HarnessConfig};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// File name looked up in the config directory
pub const CONFIG_FILE_NAME: &str = "harness.yaml";

const DEFAULTS_FILE_NAME: &str = "harness-defaults.yaml";

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Directory searched for `harness.yaml`
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader rooted at `HARNESS_CONFIG_DIR`, or the current directory
    pub fn new() -> Result<Self> {
        let config_dir = match env::var("HARNESS_CONFIG_DIR") {
            Ok(dir) => Utf8PathBuf::from(dir),
            Err(_) => {
                let cwd = env::current_dir()?;
                Utf8PathBuf::from_path_buf(cwd).map_err(|p| {
                    Error::invalid_config(format!("Non UTF-8 working directory: {}", p.display()))
                })?
            }
        };
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load the harness configuration, using `harness.yaml` from the config
    /// directory when present
    pub fn load(&self) -> Result<HarnessConfig> {
        let path = self.config_dir.join(CONFIG_FILE_NAME);
        let overlay = if path.exists() {
            Some(self.load_yaml_file(&path)?)
        } else {
            None
        };
        self.finish(overlay)
    }

    /// Load the harness configuration from an explicit file, which must exist
    pub fn load_from_file(&self, path: &Utf8Path) -> Result<HarnessConfig> {
        if !path.exists() {
            return Err(Error::config_not_found(path.as_str()));
        }
        let overlay = self.load_yaml_file(path)?;
        self.finish(Some(overlay))
    }

    /// Overlay the file document on the embedded one, then deserialize once
    /// so a file only needs the keys it changes
    fn finish(&self, overlay: Option<(Utf8PathBuf, Value)>) -> Result<HarnessConfig> {
        let mut document = Self::load_embedded_document(DEFAULTS_FILE_NAME)?;

        let source = match overlay {
            Some((path, value)) => {
                merge_yaml_values(&mut document, value);
                path.to_string()
            }
            None => format!("embedded {}", DEFAULTS_FILE_NAME),
        };

        let config: HarnessConfig = serde_yaml_ng::from_value(document)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", source, e)))?;

        let config = self.apply_env_overrides(config)?;
        Self::validate(&config)?;

        debug!(
            neutron = %config.neutron.rest_url,
            counterparty = %config.counterparty.rest_url,
            max_attempts = config.polling.max_attempts,
            "harness configuration loaded"
        );

        Ok(config)
    }

    /// Load an embedded YAML document
    fn load_embedded_document(filename: &str) -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Read a YAML file as an untyped document
    fn load_yaml_file(&self, path: &Utf8Path) -> Result<(Utf8PathBuf, Value)> {
        let content = fs::read_to_string(path)?;
        let value = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;
        Ok((path.to_path_buf(), value))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, mut config: HarnessConfig) -> Result<HarnessConfig> {
        if let Ok(val) = env::var("HARNESS_NEUTRON_REST_URL") {
            config.neutron.rest_url = val;
        }

        if let Ok(val) = env::var("HARNESS_COUNTERPARTY_REST_URL") {
            config.counterparty.rest_url = val;
        }

        if let Ok(val) = env::var("HARNESS_NEUTRON_DENOM") {
            config.neutron.denom = val;
        }

        if let Ok(val) = env::var("HARNESS_MAX_ATTEMPTS") {
            config.polling.max_attempts = val.parse().map_err(|_| {
                Error::invalid_config("HARNESS_MAX_ATTEMPTS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("HARNESS_BLOCK_TIMEOUT_SECS") {
            config.blocks.timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("HARNESS_BLOCK_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("HARNESS_FAULT_BACKEND") {
            config.faults.backend = val.parse::<FaultBackend>().map_err(Error::invalid_config)?;
        }

        Ok(config)
    }

    fn validate(config: &HarnessConfig) -> Result<()> {
        if config.polling.max_attempts == 0 {
            return Err(Error::invalid_config("polling.max-attempts must be positive"));
        }
        if config.neutron.rest_url.trim().is_empty() {
            return Err(Error::missing_field("neutron.rest-url"));
        }
        if config.counterparty.rest_url.trim().is_empty() {
            return Err(Error::missing_field("counterparty.rest-url"));
        }
        Ok(())
    }
}

/// Deep merge YAML values (source takes precedence, mappings merge key by key)
fn merge_yaml_values(dest: &mut Value, source: Value) {
    match (dest, source) {
        // An empty file parses as null and changes nothing
        (_, Value::Null) => {}
        (Value::Mapping(dest_map), Value::Mapping(source_map)) => {
            for (key, value) in source_map {
                match dest_map.get_mut(&key) {
                    Some(dest_value) => merge_yaml_values(dest_value, value),
                    None => {
                        dest_map.insert(key, value);
                    }
                }
            }
        }
        (dest_value, source_value) => {
            *dest_value = source_value;
        }
    }
}
