//! The authorized envelope
//!
//! Every successful Join/Login/Refresh returns the same shape to every
//! role-scoped caller: the principal's public fields plus a fresh token
//! pair. The stored credential never appears here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PrincipalId, RoleTag};

/// Fresh token pair with absolute expiry timestamps
///
/// `expired_at` / `refreshable_until` are absolute instants, not
/// durations, so clients can schedule renewal without clock-skew
/// ambiguity relative to request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBundle {
    /// Short-lived access token
    pub access: String,
    /// Long-lived refresh token bound to one session
    pub refresh: String,
    /// When the access token expires
    pub expired_at: DateTime<Utc>,
    /// When the refresh token expires
    pub refreshable_until: DateTime<Utc>,
}

/// Authorized principal envelope returned by Join, Login, and Refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authorized {
    /// Principal ID
    pub id: PrincipalId,
    /// Role namespace
    pub role: RoleTag,
    /// Externally-facing login identifier
    pub external_key: String,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Fresh token pair
    pub token: TokenBundle,
}

/// Decoded principal attached to an authenticated request
///
/// Derived from a verified access token; role-scoped CRUD providers rely
/// on `id` being stable and correct across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPrincipal {
    /// Principal ID
    pub id: PrincipalId,
    /// Role namespace
    pub role: RoleTag,
}
