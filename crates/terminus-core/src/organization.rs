use crate::collection::Collection;
use crate::error::{Result, TerminusError};
use crate::model::{value_to_string, Model, ModelData, ModelOptions, Scope};
use crate::transport::Transport;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    id: String,
    attributes: ModelData,
    scope: Scope,
}

impl Model for Organization {
    const KIND: &'static str = "organization";

    fn from_data(data: ModelData, options: ModelOptions) -> Self {
        Organization {
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

    fn label(&self) -> Option<String> {
        self.name()
    }
}

impl Organization {
    /// `profile.name`, the display name.
    pub fn name(&self) -> Option<String> {
        self.profile_field("name")
    }

    pub fn machine_name(&self) -> Option<String> {
        self.profile_field("machine_name")
    }

    fn profile_field(&self, field: &str) -> Option<String> {
        self.attributes
            .get("profile")
            .and_then(|p| p.get(field))
            .and_then(value_to_string)
    }

    fn matches(&self, id_or_name: &str) -> bool {
        self.id == id_or_name
            || self.name().as_deref() == Some(id_or_name)
            || self.machine_name().as_deref() == Some(id_or_name)
    }
}

// ---------------------------------------------------------------------------
// UserOrganizationMembership
// ---------------------------------------------------------------------------

/// A user's membership in one organization, keyed by organization id.
#[derive(Debug, Clone, PartialEq)]
pub struct UserOrganizationMembership {
    id: String,
    attributes: ModelData,
    scope: Scope,
}

impl Model for UserOrganizationMembership {
    const KIND: &'static str = "organization membership";

    fn from_data(data: ModelData, options: ModelOptions) -> Self {
        UserOrganizationMembership {
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

    fn label(&self) -> Option<String> {
        self.organization().name()
    }
}

impl UserOrganizationMembership {
    pub fn role(&self) -> Option<String> {
        self.get("role")
    }

    pub fn organization(&self) -> Organization {
        let mut data = match self.attributes.get("organization") {
            Some(Value::Object(map)) => map.clone(),
            _ => ModelData::new(),
        };
        data.entry("id")
            .or_insert_with(|| Value::String(self.id.clone()));
        Organization::from_data(
            data,
            ModelOptions {
                scope: self.scope.clone(),
                id: self.id.clone(),
            },
        )
    }
}

pub type UserOrganizationMemberships = Collection<UserOrganizationMembership>;

impl Collection<UserOrganizationMembership> {
    /// Resolve one of the user's organizations by id, name or machine name.
    pub fn organization(&self, id_or_name: &str) -> Result<Organization> {
        if let Ok(membership) = self.get(id_or_name) {
            return Ok(membership.organization());
        }
        for membership in self.all() {
            let org = membership.organization();
            if org.matches(id_or_name) {
                return Ok(org);
            }
        }
        Err(TerminusError::not_found(Organization::KIND, id_or_name))
    }
}

/// `GET users/{id}/memberships/organizations`
pub fn fetch_user_memberships(
    transport: &dyn Transport,
    user_id: &str,
) -> Result<UserOrganizationMemberships> {
    let listing = transport.get(&format!("users/{user_id}/memberships/organizations"))?;
    let mut memberships = UserOrganizationMemberships::new(Scope::User(user_id.to_string()));
    memberships.add_all(key_by_organization(listing))?;
    Ok(memberships)
}

/// Membership rows carry the organization id in `organization_id` or
/// `organization.id`; lift it into `id` so the collection can key on it.
fn key_by_organization(listing: Value) -> Value {
    let rows: Vec<Value> = match listing {
        Value::Array(rows) => rows,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        other => return other,
    };
    let rows = rows
        .into_iter()
        .map(|row| match row {
            Value::Object(mut map) => {
                let org_id = map
                    .get("organization_id")
                    .cloned()
                    .or_else(|| map.get("organization").and_then(|o| o.get("id")).cloned());
                if let Some(org_id) = org_id {
                    map.insert("id".to_string(), org_id);
                }
                Value::Object(map)
            }
            other => other,
        })
        .collect();
    Value::Array(rows)
}
