//! Role namespaces
//!
//! Every principal lives in exactly one role namespace ("member",
//! "systemAdmin", "patient", ...). Principals in different namespaces with
//! the same external key are distinct entities.

use serde::{Deserialize, Serialize};

/// Tag identifying a role namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTag(String);

impl RoleTag {
    /// Create a role tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The raw tag string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoleTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How a role namespace authenticates its principals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RolePolicy {
    /// Local password credential, hashed at rest
    Password,
    /// External/federated identity; no password is ever stored
    Federated,
}
