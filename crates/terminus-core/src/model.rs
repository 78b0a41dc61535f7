use crate::error::Result;
use serde_json::Value;

/// Raw attributes of one API record.
pub type ModelData = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// What a collection belongs to. Every model keeps a copy of its owning
/// collection's scope so it can resolve context (e.g. the organization an
/// upstream listing was made for) without holding the collection itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    User(String),
    Organization(String),
    Unscoped,
}

impl Scope {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Scope::User(id) => Some(id),
            _ => None,
        }
    }

    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Scope::Organization(id) => Some(id),
            _ => None,
        }
    }
}

/// Construction context handed to a [`ModelFactory`] for every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOptions {
    pub scope: Scope,
    pub id: String,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

pub trait Model: Clone + 'static {
    /// Lowercase singular name used in messages ("upstream", "organization").
    const KIND: &'static str;

    fn from_data(data: ModelData, options: ModelOptions) -> Self;

    fn id(&self) -> &str;

    fn attributes(&self) -> &ModelData;

    fn scope(&self) -> &Scope;

    /// Attribute as display string. Strings are returned bare, numbers and
    /// booleans via their JSON rendering, null and missing as `None`.
    fn get(&self, field: &str) -> Option<String> {
        value_to_string(self.attributes().get(field)?)
    }

    /// Human-readable name used by name filters.
    fn label(&self) -> Option<String> {
        self.get("label")
    }
}

pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Extract the record id from raw data. String and integer ids are accepted.
pub fn data_id(data: &ModelData) -> Option<String> {
    match data.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ModelFactory
// ---------------------------------------------------------------------------

/// Builds records for a collection. Production code uses [`DefaultFactory`];
/// tests substitute their own to observe or alter construction.
pub trait ModelFactory<M> {
    fn build(&self, data: ModelData, options: ModelOptions) -> Result<M>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl<M: Model> ModelFactory<M> for DefaultFactory {
    fn build(&self, data: ModelData, options: ModelOptions) -> Result<M> {
        Ok(M::from_data(data, options))
    }
}
