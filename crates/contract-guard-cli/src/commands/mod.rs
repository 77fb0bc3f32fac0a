pub mod action;
pub mod completions;
pub mod config;
pub mod render;
pub mod status;
pub mod watch;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use contract_guard_core::contract::parse_due_at;
use contract_guard_core::{evaluate, Config, ContractConfig, GuardStatus};

/// Shared state for every command: where the config lives.
pub struct Context {
    config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::path()?),
        }
    }

    pub fn load_config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        match &self.config_path {
            Some(path) => Ok(Config::load_from(path)?),
            None => Ok(Config::load()?),
        }
    }

    pub fn save_config(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        config.save_to(&self.config_path()?)?;
        Ok(())
    }

    /// Validated contract plus its status at `at` (or now).
    pub fn evaluate_at(
        &self,
        at: Option<&str>,
    ) -> Result<(Config, ContractConfig, GuardStatus), Box<dyn std::error::Error>> {
        let config = self.load_config()?;
        let contract = ContractConfig::try_from(&config.contract)?;
        let now = resolve_instant(at)?;
        let status = evaluate(&contract, now);
        Ok((config, contract, status))
    }
}

/// `--at` accepts the same formats as the contract due date.
pub fn resolve_instant(at: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match at {
        Some(text) => Ok(parse_due_at(text)?),
        None => Ok(Utc::now()),
    }
}

pub fn read_optional(path: Option<&Path>) -> Result<Option<String>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
        None => Ok(None),
    }
}
