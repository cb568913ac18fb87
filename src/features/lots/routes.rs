use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::lots::handlers;
use crate::features::lots::services::LotService;

/// Create routes for lot and spot management
///
/// Note: all routes require an admin role; the caller applies the auth
/// middleware.
pub fn routes(service: Arc<LotService>) -> Router {
    Router::new()
        .route(
            "/api/admin/parking-lots",
            get(handlers::list_lots).post(handlers::create_lot),
        )
        .route(
            "/api/admin/parking-lots/{id}",
            put(handlers::update_lot).delete(handlers::delete_lot),
        )
        .route("/api/admin/spots/{lot_id}", get(handlers::list_spots))
        .route(
            "/api/admin/spots/{spot_id}/details",
            get(handlers::spot_details),
        )
        .with_state(service)
}
