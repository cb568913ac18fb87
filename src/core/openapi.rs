use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::lots::{dtos as lots_dtos, handlers as lots_handlers, models as lots_models};
use crate::features::reservations::{
    dtos as reservations_dtos, handlers as reservations_handlers, models as reservations_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Lots
        lots_handlers::lot_handler::list_lots,
        lots_handlers::lot_handler::create_lot,
        lots_handlers::lot_handler::update_lot,
        lots_handlers::lot_handler::delete_lot,
        lots_handlers::lot_handler::list_spots,
        lots_handlers::lot_handler::spot_details,
        // Users
        users_handlers::user_handler::list_users,
        // Dashboard
        dashboard_handlers::dashboard_handler::get_summary,
        dashboard_handlers::dashboard_handler::get_charts,
        // Reservations
        reservations_handlers::reservation_handler::list_reservations,
        reservations_handlers::reservation_handler::open_reservation,
        reservations_handlers::reservation_handler::release_reservation,
        reservations_handlers::reservation_handler::export_csv,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            Role,
            AuthenticatedUser,
            // Lots
            lots_models::SpotStatus,
            lots_dtos::CreateLotDto,
            lots_dtos::UpdateLotDto,
            lots_dtos::LotResponseDto,
            lots_dtos::SpotResponseDto,
            lots_dtos::SpotLotInfoDto,
            lots_dtos::SpotDetailDto,
            ApiResponse<Vec<lots_dtos::LotResponseDto>>,
            ApiResponse<lots_dtos::LotResponseDto>,
            ApiResponse<Vec<lots_dtos::SpotResponseDto>>,
            ApiResponse<lots_dtos::SpotDetailDto>,
            // Users
            users_dtos::UserResponseDto,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Dashboard
            dashboard_dtos::SummaryDto,
            dashboard_dtos::DailyReservationsDto,
            dashboard_dtos::DailyRevenueDto,
            dashboard_dtos::LotOccupancyDto,
            dashboard_dtos::LotRevenueDto,
            dashboard_dtos::ChartsDto,
            ApiResponse<dashboard_dtos::SummaryDto>,
            ApiResponse<dashboard_dtos::ChartsDto>,
            // Reservations
            reservations_models::ReservationStatus,
            reservations_dtos::OpenReservationDto,
            reservations_dtos::ReservationResponseDto,
            ApiResponse<Vec<reservations_dtos::ReservationResponseDto>>,
            ApiResponse<reservations_dtos::ReservationResponseDto>,
        )
    ),
    tags(
        (name = "lots", description = "Parking lot and spot management (admin only)"),
        (name = "users", description = "User account listings (admin only)"),
        (name = "dashboard", description = "Summary and chart statistics (admin only)"),
        (name = "reservations", description = "Reservation lifecycle and history export"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Parkwise API",
        version = "0.1.0",
        description = "API documentation for the Parkwise reservation backend",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
