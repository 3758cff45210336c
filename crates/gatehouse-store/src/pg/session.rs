//! PostgreSQL session repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::SessionRow;
use crate::repo::{NewSession, SessionRepository};

/// PostgreSQL session repository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: NewSession) -> StoreResult<SessionRow> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, principal_id, role, refresh_fingerprint, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, principal_id, role, refresh_fingerprint,
                      issued_at, expires_at, revoked_at
            "#,
        )
        .bind(session.id)
        .bind(session.principal_id)
        .bind(&session.role)
        .bind(&session.refresh_fingerprint)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_current(&self, refresh_fingerprint: &str) -> StoreResult<Option<SessionRow>> {
        let session = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, principal_id, role, refresh_fingerprint,
                   issued_at, expires_at, revoked_at
            FROM sessions
            WHERE refresh_fingerprint = $1
              AND revoked_at IS NULL
              AND expires_at > NOW()
            "#,
        )
        .bind(refresh_fingerprint)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn rotate(&self, old_id: Uuid, replacement: NewSession) -> StoreResult<SessionRow> {
        let mut tx = self.pool.begin().await?;

        // Check-and-set on the old row: only a still-current session may
        // be rotated, so two concurrent rotations admit one winner.
        let revoked = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE id = $1 AND revoked_at IS NULL AND expires_at > NOW()
            "#,
        )
        .bind(old_id)
        .execute(&mut *tx)
        .await?;

        if revoked.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, principal_id, role, refresh_fingerprint, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, principal_id, role, refresh_fingerprint,
                      issued_at, expires_at, revoked_at
            "#,
        )
        .bind(replacement.id)
        .bind(replacement.principal_id)
        .bind(&replacement.role)
        .bind(&replacement.refresh_fingerprint)
        .bind(replacement.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row)
    }

    async fn revoke(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn revoke_all_for_principal(&self, principal_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE principal_id = $1 AND revoked_at IS NULL",
        )
        .bind(principal_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_by_principal(&self, principal_id: Uuid) -> StoreResult<Vec<SessionRow>> {
        let sessions = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, principal_id, role, refresh_fingerprint,
                   issued_at, expires_at, revoked_at
            FROM sessions
            WHERE principal_id = $1
            ORDER BY issued_at DESC
            "#,
        )
        .bind(principal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn delete_expired(&self) -> StoreResult<u64> {
        let result =
            sqlx::query("DELETE FROM sessions WHERE expires_at < NOW() OR revoked_at IS NOT NULL")
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
