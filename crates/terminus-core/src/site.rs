use crate::error::{Result, TerminusError};
use crate::model::{value_to_string, ModelData};
use crate::transport::Transport;
use crate::workflow::{ApiWorkflow, PollPolicy, Workflow};
use serde_json::{json, Value};
use std::sync::Arc;

pub trait Site {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Switch the site to another upstream. The change runs remotely; the
    /// returned workflow tracks it.
    fn set_upstream(&self, upstream_id: &str) -> Result<Box<dyn Workflow>>;
}

pub struct ApiSite {
    transport: Arc<dyn Transport>,
    id: String,
    name: String,
    attributes: ModelData,
    policy: PollPolicy,
}

impl ApiSite {
    /// Look a site up by name (`site-names/{name}`) and load it (`sites/{id}`).
    pub fn fetch(transport: Arc<dyn Transport>, name: &str, policy: PollPolicy) -> Result<Self> {
        let lookup = transport
            .get(&format!("site-names/{name}"))
            .map_err(|e| {
                if e.is_not_found() {
                    TerminusError::not_found("site", name)
                } else {
                    e
                }
            })?;
        let id = lookup
            .get("id")
            .and_then(value_to_string)
            .ok_or_else(|| TerminusError::not_found("site", name))?;

        let attributes = match transport.get(&format!("sites/{id}"))? {
            Value::Object(map) => map,
            other => {
                return Err(TerminusError::InvalidResponse(format!(
                    "expected a site object, got {other}"
                )))
            }
        };
        Ok(Self::from_attributes(transport, id, attributes, policy))
    }

    pub fn from_attributes(
        transport: Arc<dyn Transport>,
        id: String,
        attributes: ModelData,
        policy: PollPolicy,
    ) -> Self {
        let name = attributes
            .get("name")
            .and_then(value_to_string)
            .unwrap_or_else(|| id.clone());
        Self {
            transport,
            id,
            name,
            attributes,
            policy,
        }
    }

    pub fn attributes(&self) -> &ModelData {
        &self.attributes
    }

    /// Id of the upstream the site currently tracks, if reported.
    pub fn upstream_id(&self) -> Option<String> {
        let upstream = self.attributes.get("upstream")?;
        match upstream {
            Value::Object(map) => map.get("product_id").and_then(value_to_string),
            other => value_to_string(other),
        }
    }
}

impl Site for ApiSite {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_upstream(&self, upstream_id: &str) -> Result<Box<dyn Workflow>> {
        tracing::debug!(site = %self.name, upstream_id, "switching upstream");
        let body = json!({
            "type": "switch_upstream",
            "params": { "upstream_id": upstream_id },
        });
        let response = self
            .transport
            .post(&format!("sites/{}/workflows", self.id), &body)?;
        let workflow =
            ApiWorkflow::from_response(Arc::clone(&self.transport), &self.id, response, self.policy)?;
        Ok(Box::new(workflow))
    }
}
