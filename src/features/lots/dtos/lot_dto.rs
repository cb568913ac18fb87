use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::lots::models::{ParkingSpot, SpotStatus};
use crate::features::reservations::dtos::ReservationResponseDto;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::validation::LOT_NAME_REGEX;

/// Request DTO for creating a parking lot
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotDto {
    /// Display name of the lot
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = validate_lot_name)
    )]
    pub name: String,

    /// Street address
    #[validate(length(min = 1, max = 255, message = "Address must be 1-255 characters"))]
    pub address: String,

    /// Price per hour, must be positive
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    pub price: f64,

    /// Number of spots created with the lot
    #[validate(range(min = 1, max = 1000, message = "Number of spots must be 1-1000"))]
    pub number_of_spots: u32,
}

/// Request DTO for a partial lot update. Omitted fields keep their value;
/// the spot set is never touched here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLotDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = validate_lot_name)
    )]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Address must be 1-255 characters"))]
    pub address: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    pub price: Option<f64>,
}

fn validate_lot_name(name: &str) -> Result<(), ValidationError> {
    if LOT_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("lot_name"))
    }
}

/// Response DTO for a parking lot with its live occupancy counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotResponseDto {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub price: f64,
    pub number_of_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
    pub created_at: DateTime<Utc>,
}

/// Response DTO for a parking spot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotResponseDto {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub position: i64,
    pub spot_number: String,
    pub status: SpotStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ParkingSpot> for SpotResponseDto {
    fn from(spot: ParkingSpot) -> Self {
        Self {
            id: spot.id,
            lot_id: spot.lot_id,
            position: spot.position,
            spot_number: spot.spot_number,
            status: spot.status,
            created_at: spot.created_at,
        }
    }
}

/// Lot summary embedded in the spot detail view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotLotInfoDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
}

/// Detailed view of one spot: the spot itself, its lot, and — when it is
/// occupied — the active reservation and the user holding it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotDetailDto {
    pub spot: SpotResponseDto,
    pub lot: SpotLotInfoDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponseDto>,
}
