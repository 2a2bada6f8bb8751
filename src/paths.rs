//! Centralized path resolution for switchboard
//!
//! # Environment Variables
//!
//! - `SWITCHBOARD_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/switchboard`)
//! - `SWITCHBOARD_STATE_DIR` - Override state directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `SWITCHBOARD_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/switchboard` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\switchboard`
//!    - macOS/Linux: `~/.config/switchboard`
//!
//! For state_dir():
//! 1. `SWITCHBOARD_STATE_DIR` environment variable
//! 2. `XDG_STATE_HOME/switchboard` (if set)
//! 3. Platform default:
//!    - Windows: `%LOCALAPPDATA%\switchboard`
//!    - macOS/Linux: `~/.local/state/switchboard`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "SWITCHBOARD_CONFIG_DIR";

/// Environment variable for state directory override
pub const ENV_STATE_DIR: &str = "SWITCHBOARD_STATE_DIR";

const APP_DIR: &str = "switchboard";

/// Default manifest file name inside the config directory
pub const MANIFEST_FILE: &str = "switchboard.toml";

/// State file name inside the state directory
pub const STATE_FILE: &str = "state.toml";

/// Get the switchboard config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join(APP_DIR);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join(APP_DIR);
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join(APP_DIR);
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the switchboard state directory path
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
        let path = expand(&dir);
        log::debug!("Using state dir from {}: {}", ENV_STATE_DIR, path.display());
        return Ok(path);
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(xdg_state).join(APP_DIR);
        log::debug!("Using XDG_STATE_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            let path = local_app_data.join(APP_DIR);
            log::debug!("Using Windows state dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".local").join("state").join(APP_DIR);
    log::debug!("Using default state dir: {}", path.display());
    Ok(path)
}

/// Manifest path: the explicit one if given, else `<config_dir>/switchboard.toml`
pub fn manifest_file(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => Ok(config_dir()?.join(MANIFEST_FILE)),
    }
}

/// State path: the explicit one if given, else `<state_dir>/state.toml`
pub fn state_file(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => Ok(state_dir()?.join(STATE_FILE)),
    }
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as written.
///
/// # Examples
///
/// ```ignore
/// let home_path = paths::expand("~/dotfiles");
/// let var_path = paths::expand("$HOME/dotfiles");
/// ```
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
