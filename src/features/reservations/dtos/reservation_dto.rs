use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::reservations::models::{
    Reservation, ReservationStatus, ReservationWithContext,
};

/// Request DTO for opening a reservation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenReservationDto {
    /// Lot to allocate a spot from
    pub lot_id: Uuid,
}

/// Response DTO for a reservation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponseDto {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_name: Option<String>,
}

impl ReservationResponseDto {
    pub fn from_parts(
        reservation: Reservation,
        spot_number: Option<String>,
        lot_name: Option<String>,
    ) -> Self {
        Self {
            id: reservation.id,
            spot_id: reservation.spot_id,
            user_id: reservation.user_id,
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            cost: reservation.cost,
            status: reservation.status,
            created_at: reservation.created_at,
            spot_number,
            lot_name,
        }
    }
}

impl From<ReservationWithContext> for ReservationResponseDto {
    fn from(row: ReservationWithContext) -> Self {
        Self {
            id: row.id,
            spot_id: row.spot_id,
            user_id: row.user_id,
            start_time: row.start_time,
            end_time: row.end_time,
            cost: row.cost,
            status: row.status,
            created_at: row.created_at,
            spot_number: Some(row.spot_number),
            lot_name: Some(row.lot_name),
        }
    }
}
