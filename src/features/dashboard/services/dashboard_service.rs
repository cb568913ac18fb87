use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::{FromRow, SqlitePool};

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::*;
use crate::features::reservations::models::ReservationStatus;
use crate::shared::constants::CHART_WINDOW_DAYS;

#[derive(Debug, FromRow)]
struct SummaryRow {
    total_lots: i64,
    total_spots: i64,
    available_spots: i64,
    occupied_spots: i64,
    total_users: i64,
    total_reservations: i64,
    active_reservations: i64,
    total_revenue: f64,
    recent_reservations: i64,
}

#[derive(Debug, FromRow)]
struct ChartRow {
    created_at: DateTime<Utc>,
    status: ReservationStatus,
    cost: Option<f64>,
}

#[derive(Debug, FromRow)]
struct LotOccupancyRow {
    lot_name: String,
    occupied: i64,
    available: i64,
}

#[derive(Debug, FromRow)]
struct LotRevenueRow {
    lot_name: String,
    revenue: f64,
}

/// Read-only aggregations for the admin dashboard.
///
/// Every figure is derived from the entity store on each call; nothing in
/// here is cached authoritatively.
pub struct DashboardService {
    pool: SqlitePool,
}

impl DashboardService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Headline counters plus total revenue over completed reservations
    pub async fn summary(&self) -> Result<SummaryDto> {
        let cutoff = Utc::now() - Duration::days(CHART_WINDOW_DAYS);

        let row = sqlx::query_as::<_, SummaryRow>(
            "SELECT \
               (SELECT COUNT(*) FROM parking_lots) AS total_lots, \
               (SELECT COUNT(*) FROM parking_spots) AS total_spots, \
               (SELECT COUNT(*) FROM parking_spots WHERE status = 'available') AS available_spots, \
               (SELECT COUNT(*) FROM parking_spots WHERE status = 'occupied') AS occupied_spots, \
               (SELECT COUNT(*) FROM users WHERE role = 'user') AS total_users, \
               (SELECT COUNT(*) FROM reservations) AS total_reservations, \
               (SELECT COUNT(*) FROM reservations WHERE status = 'active') AS active_reservations, \
               (SELECT COALESCE(SUM(cost), 0.0) FROM reservations WHERE status = 'completed') AS total_revenue, \
               (SELECT COUNT(*) FROM reservations WHERE created_at >= ?1) AS recent_reservations",
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute summary: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(SummaryDto {
            total_lots: row.total_lots,
            total_spots: row.total_spots,
            available_spots: row.available_spots,
            occupied_spots: row.occupied_spots,
            total_users: row.total_users,
            total_reservations: row.total_reservations,
            active_reservations: row.active_reservations,
            total_revenue: round_money(row.total_revenue),
            recent_reservations: row.recent_reservations,
        })
    }

    /// Chart data: per-day reservation counts and revenue over a trailing
    /// window, plus per-lot occupancy and revenue breakdowns
    pub async fn charts(&self, params: &ChartQueryParams) -> Result<ChartsDto> {
        let days = params.days.clamp(1, 365);
        let today = Utc::now().date_naive();
        let window_start = day_start(today - Duration::days(days - 1));

        let rows = sqlx::query_as::<_, ChartRow>(
            "SELECT created_at, status, cost FROM reservations WHERE created_at >= ?1",
        )
        .bind(window_start)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load chart rows: {:?}", e);
            AppError::Database(e)
        })?;

        let (daily_reservations, daily_revenue) = bucket_daily(&rows, today, days);

        let occupancy_rows = sqlx::query_as::<_, LotOccupancyRow>(
            "SELECT l.name AS lot_name, \
               (SELECT COUNT(*) FROM parking_spots s \
                WHERE s.lot_id = l.id AND s.status = 'occupied') AS occupied, \
               (SELECT COUNT(*) FROM parking_spots s \
                WHERE s.lot_id = l.id AND s.status = 'available') AS available \
             FROM parking_lots l ORDER BY l.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let revenue_rows = sqlx::query_as::<_, LotRevenueRow>(
            "SELECT l.name AS lot_name, \
                    COALESCE(SUM(CASE WHEN r.status = 'completed' THEN r.cost END), 0.0) AS revenue \
             FROM parking_lots l \
             LEFT JOIN parking_spots s ON s.lot_id = l.id \
             LEFT JOIN reservations r ON r.spot_id = s.id \
             GROUP BY l.id, l.name \
             ORDER BY l.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(ChartsDto {
            daily_reservations,
            daily_revenue,
            lot_occupancy: occupancy_rows
                .into_iter()
                .map(|r| LotOccupancyDto {
                    lot_name: r.lot_name,
                    occupied: r.occupied,
                    available: r.available,
                })
                .collect(),
            lot_revenue: revenue_rows
                .into_iter()
                .map(|r| LotRevenueDto {
                    lot_name: r.lot_name,
                    revenue: round_money(r.revenue),
                })
                .collect(),
        })
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight exists"))
}

/// Fold reservation rows into zero-filled per-day buckets for the trailing
/// window ending today. Revenue only counts completed reservations.
fn bucket_daily(
    rows: &[ChartRow],
    today: NaiveDate,
    days: i64,
) -> (Vec<DailyReservationsDto>, Vec<DailyRevenueDto>) {
    let mut daily_reservations = Vec::with_capacity(days as usize);
    let mut daily_revenue = Vec::with_capacity(days as usize);

    for offset in (0..days).rev() {
        let date = today - Duration::days(offset);
        let mut count = 0;
        let mut revenue = 0.0;

        for row in rows {
            if row.created_at.date_naive() != date {
                continue;
            }
            count += 1;
            if row.status == ReservationStatus::Completed {
                revenue += row.cost.unwrap_or(0.0);
            }
        }

        daily_reservations.push(DailyReservationsDto { date, count });
        daily_revenue.push(DailyRevenueDto {
            date,
            revenue: round_money(revenue),
        });
    }

    (daily_reservations, daily_revenue)
}

fn round_money(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::features::lots::cache::LotStatusCache;
    use crate::features::lots::dtos::CreateLotDto;
    use crate::features::lots::services::LotService;
    use crate::features::reservations::services::ReservationService;
    use crate::shared::test_helpers::{seed_user, test_pool};
    use std::sync::Arc;

    fn chart_row(days_ago: i64, status: ReservationStatus, cost: Option<f64>) -> ChartRow {
        ChartRow {
            created_at: Utc::now() - Duration::days(days_ago),
            status,
            cost,
        }
    }

    #[test]
    fn buckets_are_zero_filled_and_revenue_only_counts_completed() {
        let today = Utc::now().date_naive();
        let rows = vec![
            chart_row(0, ReservationStatus::Active, None),
            chart_row(0, ReservationStatus::Completed, Some(10.0)),
            chart_row(2, ReservationStatus::Completed, Some(2.5)),
        ];

        let (counts, revenue) = bucket_daily(&rows, today, 7);
        assert_eq!(counts.len(), 7);
        assert_eq!(revenue.len(), 7);

        // Oldest bucket first, today last
        assert_eq!(counts[6].date, today);
        assert_eq!(counts[6].count, 2);
        assert_eq!(counts[4].count, 1);
        assert_eq!(counts[0].count, 0);

        assert_eq!(revenue[6].revenue, 10.0);
        assert_eq!(revenue[4].revenue, 2.5);
        assert_eq!(revenue[0].revenue, 0.0);
    }

    #[tokio::test]
    async fn summary_counts_stay_consistent_over_the_lifecycle() {
        let pool = test_pool().await;
        let lots = LotService::new(
            pool.clone(),
            Arc::new(LotStatusCache::new(std::time::Duration::ZERO)),
        );
        let reservations = ReservationService::new(pool.clone());
        let dashboard = DashboardService::new(pool.clone());

        let lot = lots
            .create(CreateLotDto {
                name: "Central Garage".to_string(),
                address: "1 Main St".to_string(),
                price: 10.0,
                number_of_spots: 3,
            })
            .await
            .unwrap();
        let user_id = seed_user(&pool, "alice", "alice@example.net", Role::User).await;

        let opened = reservations.open(user_id, lot.id).await.unwrap();

        let summary = dashboard.summary().await.unwrap();
        assert_eq!(summary.total_lots, 1);
        assert_eq!(summary.total_spots, 3);
        assert_eq!(summary.occupied_spots, 1);
        assert_eq!(
            summary.available_spots + summary.occupied_spots,
            summary.total_spots
        );
        assert_eq!(summary.total_users, 1);
        assert_eq!(summary.active_reservations, 1);
        assert_eq!(summary.recent_reservations, 1);
        assert_eq!(summary.total_revenue, 0.0);

        reservations.close(user_id, opened.id).await.unwrap();

        let summary = dashboard.summary().await.unwrap();
        assert_eq!(summary.active_reservations, 0);
        assert_eq!(summary.occupied_spots, 0);
        assert!(summary.total_revenue >= 0.0);
    }

    #[tokio::test]
    async fn charts_break_down_by_lot() {
        let pool = test_pool().await;
        let lots = LotService::new(
            pool.clone(),
            Arc::new(LotStatusCache::new(std::time::Duration::ZERO)),
        );
        let reservations = ReservationService::new(pool.clone());
        let dashboard = DashboardService::new(pool.clone());

        let lot = lots
            .create(CreateLotDto {
                name: "North Deck".to_string(),
                address: "2 Side St".to_string(),
                price: 5.0,
                number_of_spots: 2,
            })
            .await
            .unwrap();
        let user_id = seed_user(&pool, "bob", "bob@example.net", Role::User).await;
        reservations.open(user_id, lot.id).await.unwrap();

        let charts = dashboard.charts(&ChartQueryParams::default()).await.unwrap();
        assert_eq!(charts.daily_reservations.len(), 7);
        assert_eq!(charts.lot_occupancy.len(), 1);
        assert_eq!(charts.lot_occupancy[0].lot_name, "North Deck");
        assert_eq!(charts.lot_occupancy[0].occupied, 1);
        assert_eq!(charts.lot_occupancy[0].available, 1);
        assert_eq!(charts.lot_revenue.len(), 1);
        assert_eq!(charts.lot_revenue[0].revenue, 0.0);

        let today_bucket = charts.daily_reservations.last().unwrap();
        assert_eq!(today_bucket.count, 1);
    }
}
