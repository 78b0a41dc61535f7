//! The saved API session.
//!
//! Logging in happens elsewhere; this module only reads, writes and clears
//! the session file (`<cache_dir>/session`) and hands out the current user.
//! `TERMINUS_SESSION` together with `TERMINUS_USER_ID` take precedence over
//! the file.

use crate::config::Config;
use crate::error::{Result, TerminusError};
use crate::io;
use crate::paths;
use crate::transport::Transport;
use crate::user::{ApiUser, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub trait Session {
    fn user(&self) -> Result<Box<dyn User>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub session: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionData {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: paths::session_path(cache_dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SessionData> {
        if !self.path.exists() {
            return Err(TerminusError::NotLoggedIn(self.path.display().to_string()));
        }
        let content = std::fs::read_to_string(&self.path)?;
        let data: SessionData = serde_yaml::from_str(&content)?;
        if data.is_expired(Utc::now()) {
            let at = data.expires_at.map(|t| t.to_rfc3339()).unwrap_or_default();
            return Err(TerminusError::SessionExpired(at));
        }
        Ok(data)
    }

    pub fn save(&self, data: &SessionData) -> Result<()> {
        let content = serde_yaml::to_string(data)?;
        io::atomic_write(&self.path, content.as_bytes())
    }

    /// Delete the saved session. Returns false if there was none.
    pub fn clear(&self) -> Result<bool> {
        io::remove_if_exists(&self.path)
    }
}

/// Session from the environment if both variables are set, else from the
/// session file under the configured cache dir.
pub fn load_session<F>(config: &Config, lookup: F) -> Result<SessionData>
where
    F: Fn(&str) -> Option<String>,
{
    if let (Some(session), Some(user_id)) = (lookup("TERMINUS_SESSION"), lookup("TERMINUS_USER_ID"))
    {
        tracing::debug!("using session from environment");
        return Ok(SessionData {
            session,
            user_id,
            expires_at: None,
        });
    }
    SessionStore::new(&config.cache_dir()?).load()
}

// ---------------------------------------------------------------------------
// ApiSession
// ---------------------------------------------------------------------------

pub struct ApiSession {
    transport: Arc<dyn Transport>,
    data: SessionData,
}

impl ApiSession {
    pub fn new(transport: Arc<dyn Transport>, data: SessionData) -> Self {
        Self { transport, data }
    }

    pub fn user_id(&self) -> &str {
        &self.data.user_id
    }

    /// The authenticated transport, for loading sites and organizations.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn api_user(&self) -> ApiUser {
        ApiUser::new(Arc::clone(&self.transport), self.data.user_id.clone())
    }
}

impl Session for ApiSession {
    fn user(&self) -> Result<Box<dyn User>> {
        Ok(Box::new(self.api_user()))
    }
}
