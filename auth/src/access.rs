use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Coarse permission level carried in access-token claims.
///
/// Serializes as `"USER"` / `"ADMIN"` on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Get the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Access requirement attached to a protected operation.
///
/// The authorization decision is a pure function of the verified
/// principal's role against this requirement: an operation either accepts
/// any authenticated principal or demands one exact role. There is no role
/// hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub required_role: Option<Role>,
}

impl Capability {
    /// Any authenticated principal passes.
    pub const fn authenticated() -> Self {
        Self {
            required_role: None,
        }
    }

    /// Only principals holding exactly `role` pass.
    pub const fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }

    /// Decide whether a principal with `role` may perform the operation.
    pub fn permits(&self, role: Role) -> bool {
        self.required_role.map_or(true, |required| required == role)
    }
}
