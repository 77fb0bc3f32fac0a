//! Core error types for contract-guard-core.
//!
//! This module defines the error hierarchy using thiserror. Configuration
//! problems are surfaced when a guard is started, never deferred to a tick.

use std::path::PathBuf;
use thiserror::Error;

use crate::shell::ActionKind;

/// Core error type for contract-guard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Presentation shell errors
    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),

    /// The controller was started outside a tokio runtime
    #[error("No tokio runtime available to drive the guard timer: {0}")]
    RuntimeUnavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The contractual due date could not be parsed
    #[error("Invalid due date '{value}': expected RFC 3339, 'YYYY-MM-DDTHH:MM:SS' or 'YYYY-MM-DD'")]
    InvalidDueAt { value: String },

    /// Grace period must not be negative
    #[error("Invalid grace period: {0} days (must be >= 0)")]
    NegativeGraceDays(i64),

    /// Poll interval must be positive
    #[error("Invalid poll interval: must be greater than 0 ms")]
    ZeroPollInterval,

    /// Escalation thresholds are out of order or out of range
    #[error("Invalid escalation thresholds: {0}")]
    InvalidThresholds(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Presentation shell errors.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Neither a callback nor a usable contact channel exists for the action
    #[error("Action '{0}' is unavailable: no callback and no usable contact channel")]
    ActionUnavailable(ActionKind),

    /// A fallback link could not be built from the contact channel
    #[error("Invalid contact link '{link}': {message}")]
    InvalidLink { link: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
