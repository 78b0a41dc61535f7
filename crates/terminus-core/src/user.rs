use crate::error::{Result, TerminusError};
use crate::model::{value_to_string, ModelData};
use crate::organization::{fetch_user_memberships, UserOrganizationMemberships};
use crate::transport::Transport;
use crate::upstream::{fetch_user_upstreams, Upstreams};
use serde_json::Value;
use std::sync::Arc;

pub trait User {
    fn id(&self) -> &str;

    /// Every upstream this user may use, across their organizations.
    fn upstreams(&self) -> Result<Upstreams>;

    fn organization_memberships(&self) -> Result<UserOrganizationMemberships>;
}

pub struct ApiUser {
    transport: Arc<dyn Transport>,
    id: String,
}

impl ApiUser {
    pub fn new(transport: Arc<dyn Transport>, id: impl Into<String>) -> Self {
        Self {
            transport,
            id: id.into(),
        }
    }

    /// `GET users/{id}`
    pub fn profile(&self) -> Result<UserProfile> {
        match self.transport.get(&format!("users/{}", self.id))? {
            Value::Object(map) => Ok(UserProfile::from_data(&self.id, map)),
            other => Err(TerminusError::InvalidResponse(format!(
                "expected a user object, got {other}"
            ))),
        }
    }
}

impl User for ApiUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn upstreams(&self) -> Result<Upstreams> {
        fetch_user_upstreams(self.transport.as_ref(), &self.id)
    }

    fn organization_memberships(&self) -> Result<UserOrganizationMemberships> {
        fetch_user_memberships(self.transport.as_ref(), &self.id)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserProfile {
    fn from_data(id: &str, data: ModelData) -> Self {
        let profile = data.get("profile");
        let name = profile
            .and_then(|p| p.get("full_name"))
            .and_then(value_to_string);
        Self {
            id: id.to_string(),
            email: data.get("email").and_then(value_to_string),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::transport::test_transport;

    fn user(server: &mockito::ServerGuard) -> ApiUser {
        ApiUser::new(Arc::new(test_transport(server)), "u1")
    }

    #[test]
    fn profile_reads_email_and_full_name() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/users/u1")
            .with_status(200)
            .with_body(r#"{"id":"u1","email":"dev@example.com","profile":{"full_name":"Dev One"}}"#)
            .create();

        let profile = user(&server).profile().unwrap();
        assert_eq!(
            profile,
            UserProfile {
                id: "u1".into(),
                email: Some("dev@example.com".into()),
                name: Some("Dev One".into()),
            }
        );
    }

    #[test]
    fn upstreams_are_fetched_for_this_user() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("GET", "/api/users/u1/upstreams")
            .with_status(200)
            .with_body(r#"[{"id":"upstream_id","label":"Upstream Name"}]"#)
            .create();

        let upstreams = user(&server).upstreams().unwrap();
        m.assert();
        assert!(upstreams.get("upstream_id").is_ok());
    }

    #[test]
    fn memberships_are_fetched_for_this_user() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("GET", "/api/users/u1/memberships/organizations")
            .with_status(200)
            .with_body(r#"[{"organization_id":"org-1","organization":{"profile":{"name":"Acme"}}}]"#)
            .create();

        let memberships = user(&server).organization_memberships().unwrap();
        m.assert();
        assert_eq!(memberships.organization("Acme").unwrap().id(), "org-1");
    }
}
