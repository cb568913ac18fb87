use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reservations::dtos::ReservationResponseDto;
use crate::features::reservations::models::{
    ReservationHistory, ReservationStatus, ReservationWithContext,
};
use crate::features::reservations::services::allocation_service::SpotAllocator;
use crate::shared::types::PaginationQuery;

/// Row loaded when closing a reservation: the reservation plus the spot
/// label and the owning lot's name and hourly price.
#[derive(Debug, FromRow)]
struct CloseRow {
    id: Uuid,
    spot_id: Uuid,
    user_id: Uuid,
    start_time: DateTime<Utc>,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
    spot_number: String,
    lot_name: String,
    price: f64,
}

/// Reservation lifecycle manager.
///
/// `Active → Completed` is the only transition. Opening allocates a spot
/// and creates the record in one transaction; closing stamps end time and
/// cost and frees the spot in one transaction.
pub struct ReservationService {
    pool: SqlitePool,
}

impl ReservationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a reservation: claim a spot in the lot and record the claim
    pub async fn open(&self, user_id: Uuid, lot_id: Uuid) -> Result<ReservationResponseDto> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let spot = SpotAllocator::allocate(&mut tx, lot_id).await?;

        let reservation_id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO reservations (id, spot_id, user_id, start_time, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
        )
        .bind(reservation_id)
        .bind(spot.id)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert reservation: {:?}", e);
            AppError::Database(e)
        })?;

        let lot_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM parking_lots WHERE id = ?1",
        )
        .bind(lot_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Reservation opened: id={}, user={}, spot={}",
            reservation_id,
            user_id,
            spot.spot_number
        );

        Ok(ReservationResponseDto {
            id: reservation_id,
            spot_id: spot.id,
            user_id,
            start_time: now,
            end_time: None,
            cost: None,
            status: ReservationStatus::Active,
            created_at: now,
            spot_number: Some(spot.spot_number),
            lot_name: Some(lot_name),
        })
    }

    /// Close a reservation: stamp end time and cost, free the spot
    pub async fn close(
        &self,
        user_id: Uuid,
        reservation_id: Uuid,
    ) -> Result<ReservationResponseDto> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let row = sqlx::query_as::<_, CloseRow>(
            "SELECT r.id, r.spot_id, r.user_id, r.start_time, r.status, r.created_at, \
                    s.spot_number, l.name AS lot_name, l.price \
             FROM reservations r \
             JOIN parking_spots s ON s.id = r.spot_id \
             JOIN parking_lots l ON l.id = s.lot_id \
             WHERE r.id = ?1",
        )
        .bind(reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load reservation for close: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        // A reservation is only visible to its holder
        if row.user_id != user_id {
            return Err(AppError::NotFound("Reservation not found".to_string()));
        }

        if row.status != ReservationStatus::Active {
            return Err(AppError::InvalidState(
                "Reservation is already completed".to_string(),
            ));
        }

        let end_time = Utc::now();
        let cost = calculate_cost(row.start_time, end_time, row.price);

        let updated = sqlx::query(
            "UPDATE reservations \
             SET end_time = ?1, cost = ?2, status = 'completed' \
             WHERE id = ?3 AND status = 'active'",
        )
        .bind(end_time)
        .bind(cost)
        .bind(reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::InvalidState(
                "Reservation is already completed".to_string(),
            ));
        }

        sqlx::query("UPDATE parking_spots SET status = 'available' WHERE id = ?1")
            .bind(row.spot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Reservation closed: id={}, user={}, cost={:.2}",
            reservation_id,
            user_id,
            cost
        );

        Ok(ReservationResponseDto {
            id: row.id,
            spot_id: row.spot_id,
            user_id: row.user_id,
            start_time: row.start_time,
            end_time: Some(end_time),
            cost: Some(cost),
            status: ReservationStatus::Completed,
            created_at: row.created_at,
            spot_number: Some(row.spot_number),
            lot_name: Some(row.lot_name),
        })
    }

    /// List one user's reservations, newest first.
    /// Returns (reservations, total_count)
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        params: &PaginationQuery,
    ) -> Result<(Vec<ReservationResponseDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let rows = sqlx::query_as::<_, ReservationWithContext>(
            "SELECT r.id, r.spot_id, r.user_id, r.start_time, r.end_time, r.cost, r.status, \
                    r.created_at, s.spot_number, l.name AS lot_name \
             FROM reservations r \
             JOIN parking_spots s ON s.id = r.spot_id \
             JOIN parking_lots l ON l.id = s.lot_id \
             WHERE r.user_id = ?1 \
             ORDER BY r.created_at DESC \
             LIMIT ?2 OFFSET ?3",
        )
        .bind(user_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reservations: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Full reservation history of one user, newest first — the CSV export
    /// reads this.
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<ReservationHistory>> {
        let rows = sqlx::query_as::<_, ReservationHistory>(
            "SELECT r.id, s.spot_number, l.name AS lot_name, r.start_time, r.end_time, \
                    r.cost, r.status, r.created_at \
             FROM reservations r \
             JOIN parking_spots s ON s.id = r.spot_id \
             JOIN parking_lots l ON l.id = s.lot_id \
             WHERE r.user_id = ?1 \
             ORDER BY r.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load reservation history: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows)
    }
}

/// Cost of a stay: fractional hours times the lot's hourly price, rounded
/// to 2 decimal places (half-even). A zero-length stay costs 0.00.
pub(crate) fn calculate_cost(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    price_per_hour: f64,
) -> f64 {
    let hours = ((end - start).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
    let raw = hours * price_per_hour;
    Decimal::from_f64(raw)
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
    use crate::features::lots::models::SpotStatus;
    use crate::features::lots::services::LotService;
    use crate::shared::test_helpers::{seed_user, test_pool};
    use chrono::Duration as ChronoDuration;
    use std::sync::Arc;
    use std::time::Duration;

    async fn seed_lot(pool: &SqlitePool, spots: u32) -> Uuid {
        let lots = LotService::new(
            pool.clone(),
            Arc::new(LotStatusCache::new(Duration::ZERO)),
        );
        lots.create(CreateLotDto {
            name: "Central Garage".to_string(),
            address: "1 Main St".to_string(),
            price: 10.0,
            number_of_spots: spots,
        })
        .await
        .unwrap()
        .id
    }

    async fn spot_status(pool: &SqlitePool, spot_id: Uuid) -> SpotStatus {
        sqlx::query_scalar::<_, SpotStatus>("SELECT status FROM parking_spots WHERE id = ?1")
            .bind(spot_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn cost_is_fractional_hours_times_price() {
        let start = Utc::now();
        assert_eq!(
            calculate_cost(start, start + ChronoDuration::minutes(90), 10.0),
            15.0
        );
        assert_eq!(
            calculate_cost(start, start + ChronoDuration::minutes(45), 10.0),
            7.5
        );
        assert_eq!(
            calculate_cost(start, start + ChronoDuration::minutes(30), 7.5),
            3.75
        );
        assert_eq!(
            calculate_cost(start, start + ChronoDuration::minutes(1), 60.0),
            1.0
        );
    }

    #[test]
    fn zero_duration_costs_zero() {
        let start = Utc::now();
        assert_eq!(calculate_cost(start, start, 10.0), 0.0);
    }

    #[tokio::test]
    async fn open_then_close_walks_the_lifecycle() {
        let pool = test_pool().await;
        let service = ReservationService::new(pool.clone());
        let lot_id = seed_lot(&pool, 2).await;
        let user_id = seed_user(&pool, "alice", "alice@example.net", Role::User).await;

        let opened = service.open(user_id, lot_id).await.unwrap();
        assert_eq!(opened.status, ReservationStatus::Active);
        assert!(opened.cost.is_none());
        assert!(opened.end_time.is_none());
        assert_eq!(opened.spot_number.as_deref(), Some("A1"));
        assert_eq!(spot_status(&pool, opened.spot_id).await, SpotStatus::Occupied);

        // Occupied spot has exactly one active reservation
        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE spot_id = ?1 AND status = 'active'",
        )
        .bind(opened.spot_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(active, 1);

        let closed = service.close(user_id, opened.id).await.unwrap();
        assert_eq!(closed.status, ReservationStatus::Completed);
        assert!(closed.cost.is_some());
        assert!(closed.end_time.is_some());
        assert_eq!(spot_status(&pool, opened.spot_id).await, SpotStatus::Available);
    }

    #[tokio::test]
    async fn close_twice_fails_without_side_effects() {
        let pool = test_pool().await;
        let service = ReservationService::new(pool.clone());
        let lot_id = seed_lot(&pool, 1).await;
        let user_id = seed_user(&pool, "bob", "bob@example.net", Role::User).await;

        let opened = service.open(user_id, lot_id).await.unwrap();
        let closed = service.close(user_id, opened.id).await.unwrap();

        let second = service.close(user_id, opened.id).await;
        assert!(matches!(second, Err(AppError::InvalidState(_))));

        // Cost and spot status are unchanged by the failed close
        let cost = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT cost FROM reservations WHERE id = ?1",
        )
        .bind(opened.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(cost, closed.cost);
        assert_eq!(spot_status(&pool, opened.spot_id).await, SpotStatus::Available);
    }

    #[tokio::test]
    async fn close_checks_existence_and_ownership() {
        let pool = test_pool().await;
        let service = ReservationService::new(pool.clone());
        let lot_id = seed_lot(&pool, 1).await;
        let alice = seed_user(&pool, "alice", "alice@example.net", Role::User).await;
        let mallory = seed_user(&pool, "mallory", "mallory@example.net", Role::User).await;

        assert!(matches!(
            service.close(alice, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        let opened = service.open(alice, lot_id).await.unwrap();
        assert!(matches!(
            service.close(mallory, opened.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(spot_status(&pool, opened.spot_id).await, SpotStatus::Occupied);
    }

    #[tokio::test]
    async fn open_distinguishes_missing_lot_from_full_lot() {
        let pool = test_pool().await;
        let service = ReservationService::new(pool.clone());
        let lot_id = seed_lot(&pool, 1).await;
        let user_id = seed_user(&pool, "carol", "carol@example.net", Role::User).await;

        assert!(matches!(
            service.open(user_id, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        service.open(user_id, lot_id).await.unwrap();
        assert!(matches!(
            service.open(user_id, lot_id).await,
            Err(AppError::NoAvailability(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_allocation_of_last_spot_has_one_winner() {
        let pool = test_pool().await;
        let service = Arc::new(ReservationService::new(pool.clone()));
        let lot_id = seed_lot(&pool, 1).await;
        let alice = seed_user(&pool, "alice", "alice@example.net", Role::User).await;
        let bob = seed_user(&pool, "bob", "bob@example.net", Role::User).await;

        let (first, second) = tokio::join!(
            {
                let service = Arc::clone(&service);
                async move { service.open(alice, lot_id).await }
            },
            {
                let service = Arc::clone(&service);
                async move { service.open(bob, lot_id).await }
            }
        );

        let outcomes = [first, second];
        let winners = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::NoAvailability(_)))));

        // The lot still satisfies available + occupied == total
        let (available, occupied) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT \
               COUNT(*) FILTER (WHERE status = 'available'), \
               COUNT(*) FILTER (WHERE status = 'occupied') \
             FROM parking_spots WHERE lot_id = ?1",
        )
        .bind(lot_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(available + occupied, 1);
        assert_eq!(occupied, 1);
    }

    #[tokio::test]
    async fn history_is_newest_first_with_context() {
        let pool = test_pool().await;
        let service = ReservationService::new(pool.clone());
        let lot_id = seed_lot(&pool, 2).await;
        let user_id = seed_user(&pool, "dave", "dave@example.net", Role::User).await;

        let first = service.open(user_id, lot_id).await.unwrap();
        service.close(user_id, first.id).await.unwrap();
        let second = service.open(user_id, lot_id).await.unwrap();

        let history = service.history(user_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].lot_name, "Central Garage");
        assert!(history
            .iter()
            .all(|h| h.spot_number.starts_with('A')));

        let (page, total) = service
            .list_by_user(user_id, &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, second.id);
    }
}
