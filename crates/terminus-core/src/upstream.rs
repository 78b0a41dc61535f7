use crate::collection::Collection;
use crate::error::Result;
use crate::model::{Model, ModelData, ModelOptions, Scope};
use crate::transport::Transport;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Upstream
// ---------------------------------------------------------------------------

/// A code template a site can be based on.
#[derive(Debug, Clone, PartialEq)]
pub struct Upstream {
    id: String,
    attributes: ModelData,
    scope: Scope,
}

impl Model for Upstream {
    const KIND: &'static str = "upstream";

    fn from_data(data: ModelData, options: ModelOptions) -> Self {
        Upstream {
            id: options.id,
            attributes: data,
            scope: options.scope,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> &ModelData {
        &self.attributes
    }

    fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Upstream {
    pub fn framework(&self) -> Option<String> {
        self.get("framework")
    }

    pub fn organization_id(&self) -> Option<String> {
        self.get("organization_id").filter(|s| !s.is_empty())
    }

    pub fn machine_name(&self) -> Option<String> {
        self.get("machine_name")
    }

    pub fn upstream_type(&self) -> Option<String> {
        self.get("type")
    }

    pub fn repository_url(&self) -> Option<String> {
        self.get("repository_url")
    }

    pub fn summary(&self) -> UpstreamSummary {
        UpstreamSummary {
            id: self.id.clone(),
            label: self.label().unwrap_or_default(),
            machine_name: self.machine_name().unwrap_or_default(),
            upstream_type: self.upstream_type().unwrap_or_default(),
            framework: self.framework().unwrap_or_default(),
            organization_id: self.organization_id().unwrap_or_default(),
        }
    }
}

/// Flat row used by list and info output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamSummary {
    pub id: String,
    pub label: String,
    pub machine_name: String,
    #[serde(rename = "type")]
    pub upstream_type: String,
    pub framework: String,
    pub organization_id: String,
}

// ---------------------------------------------------------------------------
// Upstreams
// ---------------------------------------------------------------------------

pub type Upstreams = Collection<Upstream>;

impl Collection<Upstream> {
    /// Exact framework match, ignoring case (`drupal8`, `wordpress`).
    pub fn filter_by_framework(&self, framework: &str) -> Self {
        self.filter(|u| {
            u.framework()
                .is_some_and(|f| f.eq_ignore_ascii_case(framework))
        })
    }

    pub fn filter_by_organization(&self, organization_id: &str) -> Self {
        self.filter(|u| u.organization_id().as_deref() == Some(organization_id))
    }

    pub fn summaries(&self) -> Vec<UpstreamSummary> {
        self.all().iter().map(Upstream::summary).collect()
    }
}

/// Every upstream visible to a user: `GET users/{id}/upstreams`.
pub fn fetch_user_upstreams(transport: &dyn Transport, user_id: &str) -> Result<Upstreams> {
    let listing = transport.get(&format!("users/{user_id}/upstreams"))?;
    let mut upstreams = Upstreams::new(Scope::User(user_id.to_string()));
    upstreams.add_all(listing)?;
    tracing::debug!(user_id, count = upstreams.len(), "loaded user upstreams");
    Ok(upstreams)
}

/// Upstreams owned by an organization: `GET organizations/{id}/upstreams`.
pub fn fetch_organization_upstreams(
    transport: &dyn Transport,
    organization_id: &str,
) -> Result<Upstreams> {
    let listing = transport.get(&format!("organizations/{organization_id}/upstreams"))?;
    let mut upstreams = Upstreams::new(Scope::Organization(organization_id.to_string()));
    upstreams.add_all(listing)?;
    tracing::debug!(
        organization_id,
        count = upstreams.len(),
        "loaded organization upstreams"
    );
    Ok(upstreams)
}
