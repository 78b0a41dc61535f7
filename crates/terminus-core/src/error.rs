use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminusError {
    #[error("could not locate {kind} identified by '{id}'")]
    NotFound { kind: String, id: String },

    #[error("cannot add {kind}: record data has no id")]
    MissingId { kind: String },

    #[error("not logged in: no session found at {0}")]
    NotLoggedIn(String),

    #[error("session expired at {0}; log in again")]
    SessionExpired(String),

    #[error("API request {method} {path} failed with status {status}: {message}")]
    Api {
        method: String,
        path: String,
        status: u16,
        message: String,
    },

    #[error("workflow {id} failed: {message}")]
    WorkflowFailed { id: String, message: String },

    #[error("workflow {id} did not finish within {secs}s")]
    WorkflowTimeout { id: String, secs: u64 },

    #[error("unexpected API response: {0}")]
    InvalidResponse(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TerminusError {
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        TerminusError::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TerminusError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, TerminusError>;
