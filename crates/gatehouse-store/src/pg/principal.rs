//! PostgreSQL principal repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::PrincipalRow;
use crate::repo::{NewPrincipal, PrincipalRepository};

/// PostgreSQL principal repository
///
/// The `principals` table carries a unique index on `(role, external_key)`
/// with no `deleted_at` filter, so soft-deleted rows keep their key
/// reserved.
#[derive(Clone)]
pub struct PgPrincipalRepository {
    pool: PgPool,
}

impl PgPrincipalRepository {
    /// Create a new principal repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalRepository for PgPrincipalRepository {
    async fn create(&self, principal: NewPrincipal) -> StoreResult<PrincipalRow> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            INSERT INTO principals (id, role, external_key, credential, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING id, role, external_key, credential, status,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(principal.id)
        .bind(&principal.role)
        .bind(&principal.external_key)
        .bind(&principal.credential)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row)
    }

    async fn find_active(
        &self,
        role: &str,
        external_key: &str,
    ) -> StoreResult<Option<PrincipalRow>> {
        let principal = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, role, external_key, credential, status,
                   created_at, updated_at, deleted_at
            FROM principals
            WHERE role = $1 AND external_key = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(role)
        .bind(external_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(principal)
    }

    async fn find_by_id(&self, role: &str, id: Uuid) -> StoreResult<Option<PrincipalRow>> {
        let principal = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, role, external_key, credential, status,
                   created_at, updated_at, deleted_at
            FROM principals
            WHERE role = $1 AND id = $2
            "#,
        )
        .bind(role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(principal)
    }

    async fn soft_delete(&self, role: &str, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE principals
            SET status = 'deactivated', deleted_at = NOW(), updated_at = NOW()
            WHERE role = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(role)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

/// Map a Postgres unique-constraint violation to `DuplicateKey`
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateKey;
        }
    }
    StoreError::Sqlx(err)
}
