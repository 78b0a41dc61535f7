use crate::prompt::StdinPrompt;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use terminus_core::config::Config;
use terminus_core::paths;
use terminus_core::session::{self, ApiSession};
use terminus_core::transport::{HttpTransport, Transport};
use terminus_core::workflow::PollPolicy;

/// Settings shared by every command invocation.
pub struct App {
    pub config: Config,
    pub json: bool,
    pub yes: bool,
}

impl App {
    pub fn load(config_path: Option<&Path>, json: bool, yes: bool) -> anyhow::Result<Self> {
        let path: PathBuf = match config_path {
            Some(p) => p.to_path_buf(),
            None => paths::default_config_path()?,
        };
        let config = Config::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        tracing::debug!(base_url = %config.base_url(), "config loaded");
        Ok(Self { config, json, yes })
    }

    /// The saved session with an authenticated transport.
    pub fn session(&self) -> anyhow::Result<ApiSession> {
        let data = session::load_session(&self.config, |key| std::env::var(key).ok())?;
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(&self.config)?.with_session(data.session.clone()));
        Ok(ApiSession::new(transport, data))
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from(&self.config)
    }

    pub fn prompt(&self) -> StdinPrompt {
        StdinPrompt::new(self.yes)
    }
}
