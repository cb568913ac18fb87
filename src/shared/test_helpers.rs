#[cfg(test)]
use axum::{extract::Request, middleware::Next, Router};

#[cfg(test)]
use chrono::Utc;

#[cfg(test)]
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use crate::core::database::MIGRATOR;

#[cfg(test)]
use crate::core::error::{AppError, Result};

#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, Role};

#[cfg(test)]
use crate::modules::mail::{EmailMessage, Mailer};

/// In-memory database with the schema applied. A single connection keeps
/// the memory database alive for the whole test and serializes writers
/// the way the production pool's transactions do.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite pool");

    MIGRATOR.run(&pool).await.expect("migrations apply");

    pool
}

#[cfg(test)]
pub async fn seed_user(pool: &SqlitePool, username: &str, email: &str, role: Role) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind("x-not-a-real-hash")
    .bind(role)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("seed user");
    id
}

#[cfg(test)]
pub fn admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        username: "test-admin".to_string(),
        role: Role::Admin,
    }
}

#[cfg(test)]
pub fn regular_user(user_id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        username: "test-user".to_string(),
        role: Role::User,
    }
}

/// Wrap a router with a middleware that injects the given identity, the
/// way the JWT middleware would after validating a token.
#[cfg(test)]
pub fn with_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

/// Mailer that records every message instead of delivering it
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    messages: tokio::sync::Mutex<Vec<EmailMessage>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub async fn messages(&self) -> Vec<EmailMessage> {
        self.messages.lock().await.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }
}

/// Mailer that fails every send, for failure-tolerance tests
#[cfg(test)]
pub struct FailingMailer;

#[cfg(test)]
#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<()> {
        Err(AppError::ExternalServiceError(
            "mail gateway down".to_string(),
        ))
    }
}
