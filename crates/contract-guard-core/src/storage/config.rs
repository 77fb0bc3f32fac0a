//! TOML-based application configuration.
//!
//! Stores:
//! - The guarded contract (due date, grace period, labels, contact channels)
//! - Escalation thresholds and the effects profile
//! - Presentation shell switches
//!
//! Configuration is stored at `~/.config/contract-guard/config.toml`.
//! Loading never validates the contract; that happens when a guard starts,
//! so a half-edited file can still be inspected and fixed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::contract::ContractSettings;
use crate::error::ConfigError;
use crate::shell::ShellOptions;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/contract-guard/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contract: ContractSettings,
    #[serde(default)]
    pub shell: ShellOptions,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Parse `value` guided by the type of the value it replaces.
    ///
    /// Optional fields that are unset have no existing value; their type is
    /// inferred from the text.
    fn leaf_value(
        key: &str,
        existing: Option<&serde_json::Value>,
        value: &str,
    ) -> Result<serde_json::Value, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let number = |value: &str| -> Option<serde_json::Value> {
            if let Ok(n) = value.parse::<i64>() {
                Some(serde_json::Value::Number(n.into()))
            } else {
                value
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
            }
        };

        Ok(match existing {
            Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(format!("cannot parse '{value}' as bool: {e}")))?,
            ),
            Some(serde_json::Value::Number(_)) => {
                number(value).ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
            }
            Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            Some(_) => serde_json::Value::String(value.into()),
            None => value
                .parse::<bool>()
                .ok()
                .map(serde_json::Value::Bool)
                .or_else(|| number(value))
                .unwrap_or_else(|| serde_json::Value::String(value.into())),
        })
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                obj.insert(part.to_string(), value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/contract-guard"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key (in memory only).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let existing = Self::get_json_value_by_path(&json, key);
        let typed = Self::leaf_value(key, existing, value)?;
        let retry_as_text = existing.is_none() && !typed.is_string();

        let mut updated = json.clone();
        Self::set_json_value_by_path(&mut updated, key, typed)?;
        let parsed = match serde_json::from_value::<Config>(updated) {
            Ok(cfg) => cfg,
            Err(_) if retry_as_text => {
                let mut updated = json.clone();
                Self::set_json_value_by_path(
                    &mut updated,
                    key,
                    serde_json::Value::String(value.into()),
                )?;
                serde_json::from_value(updated).map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })?
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
        };

        // Unknown fields are ignored by serde; make sure the key actually landed.
        if parsed.get(key).is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        *self = parsed;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
