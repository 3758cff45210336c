//! Liveness and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::time::Instant;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub database: ProbeOutcome,
    /// When the background sweeper last deleted expired sessions;
    /// absent until its first run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_session_sweep: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProbeOutcome {
    pub reachable: bool,
    pub latency_ms: u64,
}

/// GET /health - liveness, never touches a dependency
pub async fn health() -> Json<Liveness> {
    Json(Liveness {
        status: "healthy",
        service: "gatehouse-auth-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready - the service can take traffic only when the database
/// answers
pub async fn ready(State(state): State<AppState>) -> Result<Json<Readiness>, StatusCode> {
    let started = Instant::now();
    let reachable = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&*state.pool)
        .await
        .is_ok();

    let database = ProbeOutcome {
        reachable,
        latency_ms: started.elapsed().as_millis() as u64,
    };

    if !database.reachable {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(Readiness {
        status: "ready",
        database,
        last_session_sweep: state.sweeper.last_run().map(|t| t.to_rfc3339()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_names_this_service() {
        let Json(liveness) = health().await;
        assert_eq!(liveness.status, "healthy");
        assert_eq!(liveness.service, "gatehouse-auth-api");
        assert!(!liveness.version.is_empty());
    }
}
