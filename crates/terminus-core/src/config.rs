use crate::error::{Result, TerminusError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Falls back to `~/.terminus/cache` when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_host() -> String {
    "terminus.pantheon.io".to_string()
}

fn default_port() -> u16 {
    443
}

fn default_base_path() -> String {
    "api".to_string()
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_poll_timeout_secs() -> u64 {
    600
}

fn default_user_agent() -> String {
    format!("terminus/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            cache_dir: None,
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Read `path` (a missing file yields the defaults), then layer the
    /// `TERMINUS_*` environment variables on top.
    pub fn load(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TERMINUS_PROTOCOL") {
            self.protocol = v;
        }
        if let Some(v) = lookup("TERMINUS_HOST") {
            self.host = v;
        }
        if let Some(v) = lookup("TERMINUS_PORT") {
            self.port = v.parse().map_err(|_| {
                TerminusError::InvalidConfig(format!("TERMINUS_PORT '{v}' is not a port"))
            })?;
        }
        if let Some(v) = lookup("TERMINUS_CACHE_DIR") {
            self.cache_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("TERMINUS_POLL_INTERVAL_MS") {
            self.poll_interval_ms = v.parse().map_err(|_| {
                TerminusError::InvalidConfig(format!(
                    "TERMINUS_POLL_INTERVAL_MS '{v}' is not a number of milliseconds"
                ))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(TerminusError::InvalidConfig(format!(
                "protocol must be http or https, got '{}'",
                self.protocol
            )));
        }
        if self.host.trim().is_empty() {
            return Err(TerminusError::InvalidConfig("host is empty".to_string()));
        }
        Ok(())
    }

    /// `protocol://host:port/base_path`
    pub fn base_url(&self) -> String {
        let base = format!("{}://{}:{}", self.protocol, self.host, self.port);
        let path = self.base_path.trim_matches('/');
        if path.is_empty() {
            base
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_cache_dir(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_production_api() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url(), "https://terminus.pantheon.io:443/api");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(3));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::from_file(&dir.path().join("config.yml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "host: api.example.test\nport: 8443\n").unwrap();
        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.host, "api.example.test");
        assert_eq!(cfg.port, 8443);
        assert_eq!(cfg.protocol, "https");
        assert_eq!(cfg.poll_timeout_secs, 600);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[
            ("TERMINUS_PROTOCOL", "http"),
            ("TERMINUS_HOST", "127.0.0.1"),
            ("TERMINUS_PORT", "8080"),
            ("TERMINUS_CACHE_DIR", "/tmp/terminus-cache"),
            ("TERMINUS_POLL_INTERVAL_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url(), "http://127.0.0.1:8080/api");
        assert_eq!(cfg.cache_dir().unwrap(), PathBuf::from("/tmp/terminus-cache"));
        assert_eq!(cfg.poll_interval(), Duration::ZERO);
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_env(env(&[("TERMINUS_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, TerminusError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        let cfg = Config {
            protocol: "ftp".to_string(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_base_path_has_no_trailing_slash() {
        let cfg = Config {
            base_path: "/".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.base_url(), "https://terminus.pantheon.io:443");
    }
}
