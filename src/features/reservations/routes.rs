use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::jobs::services::CsvExportService;
use crate::features::reservations::handlers::{self, ReservationState};
use crate::features::reservations::services::ReservationService;

/// Create routes for the reservation lifecycle
///
/// Note: all routes require a user role; the caller applies the auth
/// middleware.
pub fn routes(
    reservation_service: Arc<ReservationService>,
    export_service: Arc<CsvExportService>,
) -> Router {
    let state = ReservationState {
        reservation_service,
        export_service,
    };

    Router::new()
        .route(
            "/api/user/reservations",
            get(handlers::list_reservations).post(handlers::open_reservation),
        )
        .route(
            "/api/user/reservations/{id}/release",
            post(handlers::release_reservation),
        )
        .route("/api/user/export-csv", post(handlers::export_csv))
        .with_state(state)
}
