use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireUser;
use crate::features::jobs::services::CsvExportService;
use crate::features::reservations::dtos::{OpenReservationDto, ReservationResponseDto};
use crate::features::reservations::services::ReservationService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[derive(Clone)]
pub struct ReservationState {
    pub reservation_service: Arc<ReservationService>,
    pub export_service: Arc<CsvExportService>,
}

/// List the authenticated user's reservations
#[utoipa::path(
    get,
    path = "/api/user/reservations",
    params(PaginationQuery),
    responses(
        (status = 200, description = "User's reservations", body = ApiResponse<Vec<ReservationResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "reservations"
)]
pub async fn list_reservations(
    RequireUser(user): RequireUser,
    State(state): State<ReservationState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReservationResponseDto>>>> {
    let (reservations, total) = state
        .reservation_service
        .list_by_user(user.user_id, &pagination)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(reservations),
        None,
        Some(Meta { total }),
    )))
}

/// Reserve a spot in a lot
#[utoipa::path(
    post,
    path = "/api/user/reservations",
    request_body = OpenReservationDto,
    responses(
        (status = 200, description = "Reservation opened", body = ApiResponse<ReservationResponseDto>),
        (status = 404, description = "Parking lot not found"),
        (status = 409, description = "No available spots")
    ),
    security(("bearer_auth" = [])),
    tag = "reservations"
)]
pub async fn open_reservation(
    RequireUser(user): RequireUser,
    State(state): State<ReservationState>,
    AppJson(dto): AppJson<OpenReservationDto>,
) -> Result<Json<ApiResponse<ReservationResponseDto>>> {
    let reservation = state
        .reservation_service
        .open(user.user_id, dto.lot_id)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(reservation),
        Some("Spot reserved successfully".to_string()),
        None,
    )))
}

/// Release a reservation: computes the cost and frees the spot
#[utoipa::path(
    post,
    path = "/api/user/reservations/{id}/release",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation released", body = ApiResponse<ReservationResponseDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation already completed")
    ),
    security(("bearer_auth" = [])),
    tag = "reservations"
)]
pub async fn release_reservation(
    RequireUser(user): RequireUser,
    State(state): State<ReservationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservationResponseDto>>> {
    let reservation = state.reservation_service.close(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        Some(reservation),
        Some("Reservation released successfully".to_string()),
        None,
    )))
}

/// Kick off a CSV export of the user's reservation history
///
/// The export runs in the background; the response only acknowledges that
/// the job was accepted.
#[utoipa::path(
    post,
    path = "/api/user/export-csv",
    responses(
        (status = 200, description = "Export started"),
    ),
    security(("bearer_auth" = [])),
    tag = "reservations"
)]
pub async fn export_csv(
    RequireUser(user): RequireUser,
    State(state): State<ReservationState>,
) -> Result<Json<ApiResponse<()>>> {
    let export_service = Arc::clone(&state.export_service);
    let user_id = user.user_id;

    tokio::spawn(async move {
        match export_service.export_user_history(user_id).await {
            Ok(path) => tracing::info!("CSV export finished: {}", path.display()),
            Err(e) => tracing::error!("CSV export failed for user {}: {:?}", user_id, e),
        }
    });

    Ok(Json(ApiResponse::success(
        None,
        Some("Export started".to_string()),
        None,
    )))
}
