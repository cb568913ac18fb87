use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::dashboard::dtos::{ChartQueryParams, ChartsDto, SummaryDto};
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Summary statistics for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/admin/summary",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<SummaryDto>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn get_summary(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<SummaryDto>>> {
    let summary = service.summary().await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

/// Chart data for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/admin/charts",
    params(ChartQueryParams),
    responses(
        (status = 200, description = "Dashboard charts", body = ApiResponse<ChartsDto>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn get_charts(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<ChartQueryParams>,
) -> Result<Json<ApiResponse<ChartsDto>>> {
    let charts = service.charts(&params).await?;
    Ok(Json(ApiResponse::success(Some(charts), None, None)))
}

#[cfg(test)]
mod tests {
    use crate::features::dashboard::routes;
    use crate::features::dashboard::services::DashboardService;
    use crate::shared::test_helpers::{admin_user, regular_user, test_pool, with_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn summary_requires_the_admin_role() {
        let pool = test_pool().await;
        let app = routes::routes(Arc::new(DashboardService::new(pool)));

        let server =
            TestServer::new(with_auth(app.clone(), regular_user(Uuid::new_v4()))).unwrap();
        let response = server.get("/api/admin/summary").await;
        response.assert_status(StatusCode::FORBIDDEN);

        let server = TestServer::new(with_auth(app, admin_user())).unwrap();
        let response = server.get("/api/admin/summary").await;
        response.assert_status(StatusCode::OK);
    }
}
