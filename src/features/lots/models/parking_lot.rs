use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a parking lot
#[derive(Debug, Clone, FromRow)]
pub struct ParkingLot {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    /// Price per hour
    pub price: f64,
    pub number_of_spots: i64,
    pub created_at: DateTime<Utc>,
}
