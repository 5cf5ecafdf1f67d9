use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Login input. Only ever held for the duration of a login call.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// User profile returned by `GET /auth/user/`.
///
/// The backend's profile shape is not fixed, so every field is kept as-is.
/// Accessors cover the fields most backends return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(pub Map<String, Value>);

impl User {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Numeric or string id, rendered as a string
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    /// Best available human-readable name.
    /// Prefers `name`, then `first_name last_name`, then `username`, then email.
    pub fn display_name(&self) -> String {
        let field = |key: &str| {
            self.0
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        if let Some(name) = field("name") {
            return name.to_string();
        }

        let full: Vec<&str> = [field("first_name"), field("last_name")]
            .into_iter()
            .flatten()
            .collect();
        if !full.is_empty() {
            return full.join(" ");
        }

        field("username")
            .or_else(|| self.email())
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown user".to_string())
    }
}
