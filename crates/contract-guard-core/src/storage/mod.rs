mod config;

pub use config::Config;

use std::path::PathBuf;

/// Returns `~/.config/contract-guard[-dev]/` based on CONTRACT_GUARD_ENV.
///
/// Set CONTRACT_GUARD_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CONTRACT_GUARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("contract-guard-dev")
    } else {
        base_dir.join("contract-guard")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
