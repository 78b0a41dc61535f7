use crate::config::Config;
use crate::error::{Result, TerminusError};
use crate::model::{data_id, value_to_string, ModelData};
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A server-side asynchronous operation.
pub trait Workflow {
    fn id(&self) -> &str;

    /// Block until the operation is finished. `Ok(true)` on success; a failed
    /// or timed-out workflow is an error.
    fn check_progress(&self) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(600),
        }
    }
}

impl From<&Config> for PollPolicy {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            timeout: config.poll_timeout(),
        }
    }
}

/// Workflow tracked at `sites/{site_id}/workflows/{id}`.
pub struct ApiWorkflow {
    transport: Arc<dyn Transport>,
    site_id: String,
    id: String,
    attributes: ModelData,
    policy: PollPolicy,
}

impl ApiWorkflow {
    /// Wrap the body returned when the workflow was created.
    pub fn from_response(
        transport: Arc<dyn Transport>,
        site_id: &str,
        response: Value,
        policy: PollPolicy,
    ) -> Result<Self> {
        let attributes = match response {
            Value::Object(map) => map,
            other => {
                return Err(TerminusError::InvalidResponse(format!(
                    "expected a workflow object, got {other}"
                )))
            }
        };
        let id = data_id(&attributes).ok_or_else(|| TerminusError::MissingId {
            kind: "workflow".to_string(),
        })?;
        Ok(Self {
            transport,
            site_id: site_id.to_string(),
            id,
            attributes,
            policy,
        })
    }

    pub fn attributes(&self) -> &ModelData {
        &self.attributes
    }

    fn fetch(&self) -> Result<ModelData> {
        let path = format!("sites/{}/workflows/{}", self.site_id, self.id);
        match self.transport.get(&path)? {
            Value::Object(map) => Ok(map),
            other => Err(TerminusError::InvalidResponse(format!(
                "expected a workflow object, got {other}"
            ))),
        }
    }
}

impl Workflow for ApiWorkflow {
    fn id(&self) -> &str {
        &self.id
    }

    fn check_progress(&self) -> Result<bool> {
        let started = Instant::now();
        let mut attributes = self.attributes.clone();
        loop {
            match WorkflowResult::of(&attributes) {
                WorkflowResult::Succeeded => return Ok(true),
                WorkflowResult::Failed => {
                    return Err(TerminusError::WorkflowFailed {
                        id: self.id.clone(),
                        message: failure_message(&attributes),
                    })
                }
                WorkflowResult::Running => {}
            }
            if started.elapsed() >= self.policy.timeout {
                return Err(TerminusError::WorkflowTimeout {
                    id: self.id.clone(),
                    secs: self.policy.timeout.as_secs(),
                });
            }
            std::thread::sleep(self.policy.interval);
            attributes = self.fetch()?;
            tracing::debug!(
                workflow = %self.id,
                result = ?attributes.get("result"),
                "polled workflow"
            );
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkflowResult {
    Running,
    Succeeded,
    Failed,
}

impl WorkflowResult {
    fn of(attributes: &ModelData) -> Self {
        match attributes.get("result").and_then(Value::as_str) {
            None | Some("") | Some("running") => WorkflowResult::Running,
            Some("succeeded") => WorkflowResult::Succeeded,
            Some(_) => WorkflowResult::Failed,
        }
    }
}

/// `final_task.reason`, then the first `final_task.messages` entry, then a
/// generic line built from the workflow description.
fn failure_message(attributes: &ModelData) -> String {
    let final_task = attributes.get("final_task");
    if let Some(reason) = final_task
        .and_then(|t| t.get("reason"))
        .and_then(value_to_string)
        .filter(|r| !r.is_empty())
    {
        return reason;
    }
    let first_message = final_task
        .and_then(|t| t.get("messages"))
        .and_then(|m| match m {
            Value::Array(items) => items.first().cloned(),
            Value::Object(map) => map.values().next().cloned(),
            _ => None,
        })
        .and_then(|m| m.get("message").and_then(value_to_string));
    if let Some(message) = first_message {
        return message;
    }
    let description = attributes
        .get("description")
        .and_then(value_to_string)
        .unwrap_or_else(|| "workflow".to_string());
    format!("{description} failed")
}
