use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::services::UserInfo;

/// Body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Username/password body for login and bootstrap.
///
/// Absent or non-string fields deserialize as empty and fail validation later.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub password: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientString {
    Text(String),
    Other(IgnoredAny),
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LenientString::deserialize(deserializer)? {
        LenientString::Text(value) => value,
        LenientString::Other(_) => String::new(),
    })
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

impl SessionResponse {
    pub const fn authenticated(user: UserInfo) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
        }
    }

    pub const fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub database: &'static str,
    pub uptime_seconds: u64,
}
