use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Create routes for the admin dashboard
///
/// Note: requires an admin role; the caller applies the auth middleware.
pub fn routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/admin/summary", get(handlers::get_summary))
        .route("/api/admin/charts", get(handlers::get_charts))
        .with_state(service)
}
