use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The backend's record for the signed-in user.
///
/// Only `id` and `email` are guaranteed; everything else the backend sends
/// (`role`, `first_name`, custom fields...) lands in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            fields: Map::new(),
        }
    }

    /// Adds or replaces a named field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Reads a field by name, `Value::Null` when absent.
    ///
    /// `id` and `email` are addressable like any other field.
    pub fn field(&self, name: &str) -> Value {
        match name {
            "id" => Value::String(self.id.clone()),
            "email" => Value::String(self.email.clone()),
            _ => self.fields.get(name).cloned().unwrap_or(Value::Null),
        }
    }
}
