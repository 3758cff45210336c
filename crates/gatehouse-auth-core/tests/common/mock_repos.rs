//! Mock repositories for testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use gatehouse_store::{
    NewPrincipal, NewSession, PrincipalRepository, PrincipalRow, SessionRepository, SessionRow,
    StoreError, StoreResult,
};

fn key_of(role: &str, external_key: &str) -> String {
    format!("{role}\u{1f}{external_key}")
}

/// In-memory principal repository for testing.
///
/// The `(role, external_key)` index is never cleaned up on soft delete,
/// matching the uniqueness rule: a deleted account keeps its key reserved.
#[derive(Default, Clone)]
pub struct MockPrincipalRepository {
    principals: Arc<DashMap<Uuid, PrincipalRow>>,
    by_key: Arc<DashMap<String, Uuid>>,
}

impl MockPrincipalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PrincipalRepository for MockPrincipalRepository {
    async fn create(&self, principal: NewPrincipal) -> StoreResult<PrincipalRow> {
        let key = key_of(&principal.role, &principal.external_key);
        if self.by_key.contains_key(&key) {
            return Err(StoreError::DuplicateKey);
        }

        let now = Utc::now();
        let row = PrincipalRow {
            id: principal.id,
            role: principal.role,
            external_key: principal.external_key,
            credential: principal.credential,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.by_key.insert(key, row.id);
        self.principals.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_active(
        &self,
        role: &str,
        external_key: &str,
    ) -> StoreResult<Option<PrincipalRow>> {
        Ok(self
            .by_key
            .get(&key_of(role, external_key))
            .and_then(|id| self.principals.get(id.value()).map(|r| r.value().clone()))
            .filter(|p| p.deleted_at.is_none()))
    }

    async fn find_by_id(&self, role: &str, id: Uuid) -> StoreResult<Option<PrincipalRow>> {
        Ok(self
            .principals
            .get(&id)
            .map(|r| r.value().clone())
            .filter(|p| p.role == role))
    }

    async fn soft_delete(&self, role: &str, id: Uuid) -> StoreResult<()> {
        let Some(mut principal) = self.principals.get_mut(&id) else {
            return Err(StoreError::NotFound);
        };
        if principal.role != role || principal.deleted_at.is_some() {
            return Err(StoreError::NotFound);
        }

        let now = Utc::now();
        principal.status = "deactivated".to_string();
        principal.deleted_at = Some(now);
        principal.updated_at = now;
        Ok(())
    }
}

/// In-memory session repository for testing
#[derive(Default, Clone)]
pub struct MockSessionRepository {
    sessions: Arc<DashMap<Uuid, SessionRow>>,
    by_fingerprint: Arc<DashMap<String, Uuid>>,
}

impl MockSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn create(&self, session: NewSession) -> StoreResult<SessionRow> {
        let row = session.into_row(Utc::now());
        self.by_fingerprint
            .insert(row.refresh_fingerprint.clone(), row.id);
        self.sessions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_current(&self, refresh_fingerprint: &str) -> StoreResult<Option<SessionRow>> {
        Ok(self
            .by_fingerprint
            .get(refresh_fingerprint)
            .and_then(|id| self.sessions.get(id.value()).map(|r| r.value().clone()))
            .filter(SessionRow::is_current))
    }

    async fn rotate(&self, old_id: Uuid, replacement: NewSession) -> StoreResult<SessionRow> {
        // Check-and-set under the shard guard: at most one concurrent
        // rotation sees the old row as still current.
        {
            let Some(mut old) = self.sessions.get_mut(&old_id) else {
                return Err(StoreError::NotFound);
            };
            if !old.is_current() {
                return Err(StoreError::NotFound);
            }
            old.revoked_at = Some(Utc::now());
        }

        self.create(replacement).await
    }

    async fn revoke(&self, id: Uuid) -> StoreResult<()> {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            if session.revoked_at.is_none() {
                session.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn revoke_all_for_principal(&self, principal_id: Uuid) -> StoreResult<u64> {
        let mut count = 0;
        for mut session in self.sessions.iter_mut() {
            if session.principal_id == principal_id && session.revoked_at.is_none() {
                session.revoked_at = Some(Utc::now());
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find_by_principal(&self, principal_id: Uuid) -> StoreResult<Vec<SessionRow>> {
        Ok(self
            .sessions
            .iter()
            .filter(|r| r.value().principal_id == principal_id)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn delete_expired(&self) -> StoreResult<u64> {
        let gone: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|r| !r.value().is_current())
            .map(|r| r.id)
            .collect();
        let count = gone.len() as u64;
        for id in gone {
            if let Some((_, session)) = self.sessions.remove(&id) {
                self.by_fingerprint.remove(&session.refresh_fingerprint);
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_principal(role: &str, key: &str) -> NewPrincipal {
        NewPrincipal {
            id: Uuid::new_v4(),
            role: role.to_string(),
            external_key: key.to_string(),
            credential: None,
        }
    }

    fn new_session(principal_id: Uuid, fingerprint: &str) -> NewSession {
        NewSession {
            id: Uuid::new_v4(),
            principal_id,
            role: "member".to_string(),
            refresh_fingerprint: fingerprint.to_string(),
            expires_at: Utc::now() + Duration::hours(24),
        }
    }

    #[tokio::test]
    async fn test_duplicate_key_survives_soft_delete() {
        let repo = MockPrincipalRepository::new();
        let created = repo.create(new_principal("member", "a@x.com")).await.unwrap();

        repo.soft_delete("member", created.id).await.unwrap();

        let result = repo.create(new_principal("member", "a@x.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateKey)));
    }

    #[tokio::test]
    async fn test_second_soft_delete_fails() {
        let repo = MockPrincipalRepository::new();
        let created = repo.create(new_principal("member", "a@x.com")).await.unwrap();

        repo.soft_delete("member", created.id).await.unwrap();
        let result = repo.soft_delete("member", created.id).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_same_key_different_roles() {
        let repo = MockPrincipalRepository::new();
        repo.create(new_principal("member", "a@x.com")).await.unwrap();
        repo.create(new_principal("operator", "a@x.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rotate_old_session_loses() {
        let repo = MockSessionRepository::new();
        let principal_id = Uuid::new_v4();
        let old = repo.create(new_session(principal_id, "fp-old")).await.unwrap();

        repo.rotate(old.id, new_session(principal_id, "fp-new"))
            .await
            .unwrap();

        // The old row was consumed; a second rotation against it fails
        let result = repo
            .rotate(old.id, new_session(principal_id, "fp-other"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_revoke_idempotent() {
        let repo = MockSessionRepository::new();
        let principal_id = Uuid::new_v4();
        let session = repo.create(new_session(principal_id, "fp")).await.unwrap();

        repo.revoke(session.id).await.unwrap();
        repo.revoke(session.id).await.unwrap();

        let sessions = repo.find_by_principal(principal_id).await.unwrap();
        assert!(sessions.iter().all(|s| s.revoked_at.is_some()));
    }

    #[tokio::test]
    async fn test_delete_expired_removes_revoked() {
        let repo = MockSessionRepository::new();
        let keeper = Uuid::new_v4();
        let goner = Uuid::new_v4();
        repo.create(new_session(keeper, "fp-1")).await.unwrap();
        let revoked = repo.create(new_session(goner, "fp-2")).await.unwrap();

        repo.revoke(revoked.id).await.unwrap();
        let count = repo.delete_expired().await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(repo.find_by_principal(keeper).await.unwrap().len(), 1);
        assert!(repo.find_by_principal(goner).await.unwrap().is_empty());
    }
}
