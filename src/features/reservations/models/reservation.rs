use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Reservation lifecycle state. `Active → Completed` is the only
/// transition; completed is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
        }
    }
}

/// Database model for a reservation
#[derive(Debug, Clone, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    /// NULL while the reservation is active
    pub end_time: Option<DateTime<Utc>>,
    /// Set once on close, NULL while active
    pub cost: Option<f64>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Reservation row joined with its spot label and lot name
#[derive(Debug, Clone, FromRow)]
pub struct ReservationWithContext {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub spot_number: String,
    pub lot_name: String,
}

/// Row shape of the reservation history export
#[derive(Debug, Clone, FromRow)]
pub struct ReservationHistory {
    pub id: Uuid,
    pub spot_number: String,
    pub lot_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}
