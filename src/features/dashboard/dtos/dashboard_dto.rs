use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::CHART_WINDOW_DAYS;

/// Headline counters for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub total_lots: i64,
    pub total_spots: i64,
    pub available_spots: i64,
    pub occupied_spots: i64,
    pub total_users: i64,
    pub total_reservations: i64,
    pub active_reservations: i64,
    /// Sum of cost over completed reservations
    pub total_revenue: f64,
    /// Reservations created in the trailing 7 days
    pub recent_reservations: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyReservationsDto {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenueDto {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotOccupancyDto {
    pub lot_name: String,
    pub occupied: i64,
    pub available: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotRevenueDto {
    pub lot_name: String,
    pub revenue: f64,
}

/// Chart payload for the admin dashboard: trailing per-day buckets plus
/// per-lot breakdowns
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartsDto {
    pub daily_reservations: Vec<DailyReservationsDto>,
    pub daily_revenue: Vec<DailyRevenueDto>,
    pub lot_occupancy: Vec<LotOccupancyDto>,
    pub lot_revenue: Vec<LotRevenueDto>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ChartQueryParams {
    /// Trailing window in days (default: 7)
    #[serde(default = "default_days")]
    #[param(minimum = 1, maximum = 365)]
    pub days: i64,
}

fn default_days() -> i64 {
    CHART_WINDOW_DAYS
}

impl Default for ChartQueryParams {
    fn default() -> Self {
        Self {
            days: CHART_WINDOW_DAYS,
        }
    }
}
