use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Spot occupancy state. A spot is occupied exactly while one active
/// reservation references it; only the allocator and the reservation
/// lifecycle flip this value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
}

/// Database model for a parking spot
#[derive(Debug, Clone, FromRow)]
pub struct ParkingSpot {
    pub id: Uuid,
    pub lot_id: Uuid,
    /// 1-based creation index the label derives from
    pub position: i64,
    pub spot_number: String,
    pub status: SpotStatus,
    pub created_at: DateTime<Utc>,
}
