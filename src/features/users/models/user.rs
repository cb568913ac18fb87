use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::Role;

/// Database model for a user account.
///
/// Accounts are provisioned by the external auth service; this backend
/// reads them for listings, ownership checks and the mail jobs. The email
/// address is a real stored column, not derived from the username.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
