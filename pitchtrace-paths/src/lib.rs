//! Path utilities for pitchtrace.
//!
//! Single source of truth for where the config file lives and where the
//! pitch estimator's scratch artifacts are allocated.
//!
//! # Platform Behavior
//!
//! | Platform | Config Directory | Scratch Root |
//! |----------|------------------|--------------|
//! | Linux    | `~/.config/pitchtrace` | `$XDG_RUNTIME_DIR/pitchtrace` or `$TMPDIR` |
//! | macOS    | `~/Library/Application Support/pitchtrace` | `$TMPDIR` |
//! | Windows  | `%APPDATA%/pitchtrace` | `%TEMP%` |
//!
//! The system temp dir is shared between users, so nothing is created there
//! up front. Each scratch artifact is its own uniquely named private directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// Errors specific to path operations.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine config directory")]
    NoConfigDirectory,

    #[error("Scratch root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Application identifier used in path construction.
const APP_NAME: &str = "pitchtrace";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the configuration directory without creating it.
///
/// # Platform Behavior
/// - **Linux**: `~/.config/pitchtrace`
/// - **macOS**: `~/Library/Application Support/pitchtrace`
/// - **Windows**: `%APPDATA%/pitchtrace`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(PathError::NoConfigDirectory)?;
    Ok(base.join(APP_NAME))
}

/// Get the default config file path.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Get the root directory under which per-call scratch artifacts are created.
///
/// # Platform Behavior
/// - **Linux**: `$XDG_RUNTIME_DIR/pitchtrace` (created 0o700), or the system
///   temp dir when there is no usable runtime dir
/// - **Other**: the system temp dir
pub fn scratch_root() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        Ok(scratch_root_in(dirs::runtime_dir().as_deref()))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Ok(scratch_root_in(None))
    }
}

/// Scratch root given an optional per-user runtime dir.
///
/// Falls back to the system temp dir when `runtime_dir` is missing or its
/// `pitchtrace` entry can't be used as a private directory.
pub fn scratch_root_in(runtime_dir: Option<&Path>) -> PathBuf {
    if let Some(runtime_dir) = runtime_dir.filter(|dir| dir.is_dir()) {
        let dir = runtime_dir.join(APP_NAME);
        if ensure_private_dir(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

/// Create `dir` (and parents) if missing, mode 0o700 on Unix.
///
/// An existing non-directory at `dir` is an error.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PathError::NotADirectory(dir.to_path_buf()).into());
        }
        return Ok(());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(dir, perms)
            .with_context(|| format!("Failed to set permissions on {}", dir.display()))?;
    }

    Ok(())
}
