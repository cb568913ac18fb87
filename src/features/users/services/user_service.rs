use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::User;
use crate::shared::types::PaginationQuery;

/// Read-side service over user accounts
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List user accounts, newest first.
    /// Returns (users, total_count)
    pub async fn list(&self, params: &PaginationQuery) -> Result<(Vec<UserResponseDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at \
             FROM users ORDER BY created_at DESC \
             LIMIT ?1 OFFSET ?2",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((users.into_iter().map(Into::into).collect(), total))
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at \
             FROM users WHERE id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// All accounts with the user role — the monthly report recipients
    pub async fn list_regular(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at \
             FROM users WHERE role = 'user' ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(users)
    }

    /// Users with the user role and no reservation created since the
    /// cutoff — the daily reminder recipients
    pub async fn inactive_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.password_hash, u.role, u.created_at \
             FROM users u \
             WHERE u.role = 'user' \
               AND NOT EXISTS ( \
                   SELECT 1 FROM reservations r \
                   WHERE r.user_id = u.id AND r.created_at >= ?1 \
               ) \
             ORDER BY u.username",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find inactive users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::shared::test_helpers::{seed_user, test_pool};
    use chrono::Duration;
    use fake::{faker::internet::en::FreeEmail, Fake};

    #[tokio::test]
    async fn list_never_serializes_the_password_hash() {
        let pool = test_pool().await;
        let service = UserService::new(pool.clone());
        let email: String = FreeEmail().fake();
        seed_user(&pool, "alice", &email, Role::User).await;
        seed_user(&pool, "boss", "boss@example.net", Role::Admin).await;

        let (users, total) = service.list(&PaginationQuery::default()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(users.len(), 2);

        let serialized = serde_json::to_string(&users).unwrap();
        assert!(!serialized.contains("password"));
    }

    #[tokio::test]
    async fn inactive_since_skips_recently_active_users() {
        let pool = test_pool().await;
        let service = UserService::new(pool.clone());
        let idle = seed_user(&pool, "idle", "idle@example.net", Role::User).await;
        let active = seed_user(&pool, "active", "active@example.net", Role::User).await;
        seed_user(&pool, "boss", "boss@example.net", Role::Admin).await;

        // One reservation for "active", created now. The spot/lot rows are
        // irrelevant for this query.
        sqlx::query(
            "INSERT INTO reservations (id, spot_id, user_id, start_time, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
        )
        .bind(Uuid::new_v4())
        .bind(Uuid::new_v4())
        .bind(active)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        let cutoff = Utc::now() - Duration::days(7);
        let inactive = service.inactive_since(cutoff).await.unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].id, idle);
    }

    #[tokio::test]
    async fn find_by_id_reports_missing_users() {
        let pool = test_pool().await;
        let service = UserService::new(pool);
        assert!(matches!(
            service.find_by_id(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
