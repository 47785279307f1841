//! Authentication models

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User roles for authorization.
///
/// A closed enumeration; role strings are normalized into this type once at
/// the trust boundary (token decode, registration) and never compared as raw
/// strings downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Ordinary staff member - own records only
    Member,
    /// Administrator - manages accounts and all records
    Admin,
    /// Super administrator - as Admin, without the SuperAdmin carve-out
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "Member",
            Role::Admin => "Admin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    /// Whether this role carries administrative privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::error::Error;

    /// Case-insensitive parse. The stored data this system replaces mixed
    /// "Admin", "admin" and "superadmin" freely.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            "superadmin" | "super_admin" | "super-admin" => Ok(Role::SuperAdmin),
            other => Err(crate::error::Error::Validation(format!(
                "Unknown role: {}",
                other
            ))),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Role::from_str(&s).map_err(D::Error::custom)
    }
}

/// Caller identity established by the authentication middleware.
///
/// Id and role come from the verified token; the display fields are a
/// read-through from the user store on every request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub office: String,
}

impl AuthUser {
    /// Display name used as the author key on training records.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Login credentials; `identifier` is a username or an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Login response with token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub office: String,
    pub role: Role,
    #[serde(rename = "isApproved")]
    pub is_approved: bool,
    pub token: String,
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub title: String,
    pub lastname: String,
    pub firstname: String,
    #[serde(default)]
    pub middlename: Option<String>,
    pub office: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Response to a successful token refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub office: String,
    pub role: Role,
    pub token: String,
}
