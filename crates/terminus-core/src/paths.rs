use crate::error::{Result, TerminusError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TERMINUS_DIR: &str = ".terminus";
pub const CACHE_DIR: &str = "cache";
pub const CONFIG_FILE: &str = "config.yml";
pub const SESSION_FILE: &str = "session";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `~/.terminus`
pub fn terminus_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(TerminusError::HomeNotFound)?;
    Ok(home.join(TERMINUS_DIR))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(terminus_dir()?.join(CONFIG_FILE))
}

pub fn default_cache_dir() -> Result<PathBuf> {
    Ok(terminus_dir()?.join(CACHE_DIR))
}

pub fn session_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(SESSION_FILE)
}

/// Join API path segments under `base`, trimming stray slashes on both sides.
pub fn api_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
