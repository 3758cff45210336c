//! Authentication handlers (join, login, refresh, logout, me)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatehouse_types::{Authorized, PrincipalId, RoleTag, SessionId};

use crate::error::ApiResult;
use crate::extractors::Bearer;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub external_key: String,
    /// Password for local roles; absent for federated roles
    pub credential: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub external_key: String,
    pub credential: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    pub revoked_sessions: u64,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: PrincipalId,
    pub role: RoleTag,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub issued_at: String,
    pub expires_at: String,
    pub revoked: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionInfo>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/:role/join
///
/// Register a new principal in a role namespace
pub async fn join(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(req): Json<JoinRequest>,
) -> ApiResult<(StatusCode, Json<Authorized>)> {
    let role = RoleTag::new(role);
    let authorized = state
        .auth
        .join(&role, &req.external_key, req.credential.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(authorized)))
}

/// POST /api/v1/auth/:role/login
///
/// Authenticate an existing principal
pub async fn login(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Authorized>> {
    let role = RoleTag::new(role);
    let authorized = state
        .auth
        .login(&role, &req.external_key, req.credential.as_deref())
        .await?;

    Ok(Json(authorized))
}

/// POST /api/v1/auth/refresh
///
/// Redeem a refresh token for a fresh token pair. An empty token body
/// takes the same path as any other invalid token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<Authorized>> {
    let authorized = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(authorized))
}

/// POST /api/v1/auth/logout
///
/// End the session behind a refresh token
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> ApiResult<Json<LogoutResponse>> {
    state.auth.logout(&req.refresh_token).await?;
    Ok(Json(LogoutResponse { success: true }))
}

/// DELETE /api/v1/auth/:role/principals/:id
///
/// Deactivate a principal and revoke all of its sessions
pub async fn deactivate(
    State(state): State<AppState>,
    Path((role, id)): Path<(String, Uuid)>,
) -> ApiResult<Json<DeactivateResponse>> {
    let role = RoleTag::new(role);
    let revoked_sessions = state.auth.deactivate(&role, PrincipalId(id)).await?;

    Ok(Json(DeactivateResponse { revoked_sessions }))
}

/// GET /api/v1/auth/me
///
/// Identify the principal behind a bearer access token
pub async fn me(Bearer(principal): Bearer) -> ApiResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        id: principal.id,
        role: principal.role,
    }))
}

/// GET /api/v1/auth/sessions
///
/// List the calling principal's sessions
pub async fn sessions(
    State(state): State<AppState>,
    Bearer(principal): Bearer,
) -> ApiResult<Json<SessionsResponse>> {
    let rows = state.auth.sessions_for(principal.id).await?;

    let sessions = rows
        .into_iter()
        .map(|row| SessionInfo {
            id: row.session_id(),
            issued_at: row.issued_at.to_rfc3339(),
            expires_at: row.expires_at.to_rfc3339(),
            revoked: row.revoked_at.is_some(),
        })
        .collect();

    Ok(Json(SessionsResponse { sessions }))
}
