use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role. Administrator is the only role this service assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
        }
    }

    /// Reads a stored role column.
    ///
    /// Rows written before the column existed carry no value and are treated
    /// as administrators.
    pub fn from_column(value: Option<&str>) -> anyhow::Result<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("admin") => Ok(Self::Admin),
            Some(other) => anyhow::bail!("Unknown role stored for user: {other}"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record as held by the store.
#[derive(Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input for creating a user. The store assigns `id` and `created_at`.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}
