use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::lots::dtos::{
    CreateLotDto, LotResponseDto, SpotDetailDto, SpotResponseDto, UpdateLotDto,
};
use crate::features::lots::services::LotService;
use crate::shared::types::ApiResponse;

/// List all parking lots with occupancy counts
#[utoipa::path(
    get,
    path = "/api/admin/parking-lots",
    responses(
        (status = 200, description = "List of parking lots", body = ApiResponse<Vec<LotResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "lots"
)]
pub async fn list_lots(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LotService>>,
) -> Result<Json<ApiResponse<Vec<LotResponseDto>>>> {
    let lots = service.list().await?;
    Ok(Json(ApiResponse::success(Some(lots), None, None)))
}

/// Create a parking lot together with its spots
#[utoipa::path(
    post,
    path = "/api/admin/parking-lots",
    request_body = CreateLotDto,
    responses(
        (status = 200, description = "Parking lot created", body = ApiResponse<LotResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "lots"
)]
pub async fn create_lot(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LotService>>,
    AppJson(dto): AppJson<CreateLotDto>,
) -> Result<Json<ApiResponse<LotResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let lot = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(lot),
        Some("Parking lot created successfully".to_string()),
        None,
    )))
}

/// Update name, address or price of a parking lot
#[utoipa::path(
    put,
    path = "/api/admin/parking-lots/{id}",
    params(("id" = Uuid, Path, description = "Parking lot ID")),
    request_body = UpdateLotDto,
    responses(
        (status = 200, description = "Parking lot updated", body = ApiResponse<LotResponseDto>),
        (status = 404, description = "Parking lot not found")
    ),
    security(("bearer_auth" = [])),
    tag = "lots"
)]
pub async fn update_lot(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LotService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateLotDto>,
) -> Result<Json<ApiResponse<LotResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let lot = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(lot),
        Some("Parking lot updated successfully".to_string()),
        None,
    )))
}

/// Delete a parking lot and its history; fails while any spot is occupied
#[utoipa::path(
    delete,
    path = "/api/admin/parking-lots/{id}",
    params(("id" = Uuid, Path, description = "Parking lot ID")),
    responses(
        (status = 200, description = "Parking lot deleted"),
        (status = 404, description = "Parking lot not found"),
        (status = 409, description = "Spots are occupied")
    ),
    security(("bearer_auth" = [])),
    tag = "lots"
)]
pub async fn delete_lot(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LotService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Parking lot deleted successfully".to_string()),
        None,
    )))
}

/// List the spots of one lot
#[utoipa::path(
    get,
    path = "/api/admin/spots/{lot_id}",
    params(("lot_id" = Uuid, Path, description = "Parking lot ID")),
    responses(
        (status = 200, description = "Spots of the lot", body = ApiResponse<Vec<SpotResponseDto>>),
        (status = 404, description = "Parking lot not found")
    ),
    security(("bearer_auth" = [])),
    tag = "lots"
)]
pub async fn list_spots(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LotService>>,
    Path(lot_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SpotResponseDto>>>> {
    let spots = service.list_spots(lot_id).await?;
    Ok(Json(ApiResponse::success(Some(spots), None, None)))
}

/// Spot detail with lot, active reservation and holder
#[utoipa::path(
    get,
    path = "/api/admin/spots/{spot_id}/details",
    params(("spot_id" = Uuid, Path, description = "Parking spot ID")),
    responses(
        (status = 200, description = "Spot detail", body = ApiResponse<SpotDetailDto>),
        (status = 404, description = "Parking spot not found")
    ),
    security(("bearer_auth" = [])),
    tag = "lots"
)]
pub async fn spot_details(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LotService>>,
    Path(spot_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SpotDetailDto>>> {
    let detail = service.spot_detail(spot_id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}
