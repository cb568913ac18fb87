use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::lots::cache::{LotAvailability, LotStatusCache};
use crate::features::lots::dtos::{
    CreateLotDto, LotResponseDto, SpotDetailDto, SpotLotInfoDto, SpotResponseDto, UpdateLotDto,
};
use crate::features::lots::models::{ParkingLot, ParkingSpot, SpotStatus};
use crate::features::reservations::dtos::ReservationResponseDto;
use crate::features::reservations::models::Reservation;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::User;
use crate::shared::constants::{MAX_SPOTS_PER_LOT, SPOTS_PER_LABEL_GROUP};

/// Service for parking lot and spot management.
///
/// Lots and their spots are created and deleted together; cascades are
/// explicit here rather than delegated to the storage engine so the
/// delete-while-occupied invariant stays visible and test-covered.
pub struct LotService {
    pool: SqlitePool,
    cache: Arc<LotStatusCache>,
}

impl LotService {
    pub fn new(pool: SqlitePool, cache: Arc<LotStatusCache>) -> Self {
        Self { pool, cache }
    }

    /// List all lots with their live occupancy counts
    pub async fn list(&self) -> Result<Vec<LotResponseDto>> {
        let lots = sqlx::query_as::<_, ParkingLot>(
            "SELECT id, name, address, price, number_of_spots, created_at \
             FROM parking_lots ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list parking lots: {:?}", e);
            AppError::Database(e)
        })?;

        let mut responses = Vec::with_capacity(lots.len());
        for lot in lots {
            responses.push(self.to_response(lot).await?);
        }

        Ok(responses)
    }

    /// Create a lot together with its spots, all-or-nothing
    pub async fn create(&self, dto: CreateLotDto) -> Result<LotResponseDto> {
        if dto.price <= 0.0 {
            return Err(AppError::Validation(
                "Price must be greater than zero".to_string(),
            ));
        }
        if dto.number_of_spots == 0 || dto.number_of_spots > MAX_SPOTS_PER_LOT {
            return Err(AppError::Validation(format!(
                "Number of spots must be between 1 and {}",
                MAX_SPOTS_PER_LOT
            )));
        }

        let lot_id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO parking_lots (id, name, address, price, number_of_spots, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(lot_id)
        .bind(&dto.name)
        .bind(&dto.address)
        .bind(dto.price)
        .bind(dto.number_of_spots as i64)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert parking lot: {:?}", e);
            AppError::Database(e)
        })?;

        for position in 1..=dto.number_of_spots {
            sqlx::query(
                "INSERT INTO parking_spots (id, lot_id, position, spot_number, status, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4())
            .bind(lot_id)
            .bind(position as i64)
            .bind(spot_label(position))
            .bind(SpotStatus::Available)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert parking spot {}: {:?}", position, e);
                AppError::Database(e)
            })?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Parking lot created: id={}, name={}, spots={}",
            lot_id,
            dto.name,
            dto.number_of_spots
        );

        let lot = self.find_lot(lot_id).await?;
        self.to_response(lot).await
    }

    /// Partial update of name/address/price; the spot set is untouched
    pub async fn update(&self, lot_id: Uuid, dto: UpdateLotDto) -> Result<LotResponseDto> {
        if let Some(price) = dto.price {
            if price <= 0.0 {
                return Err(AppError::Validation(
                    "Price must be greater than zero".to_string(),
                ));
            }
        }

        let lot = sqlx::query_as::<_, ParkingLot>(
            "UPDATE parking_lots \
             SET name = COALESCE(?1, name), \
                 address = COALESCE(?2, address), \
                 price = COALESCE(?3, price) \
             WHERE id = ?4 \
             RETURNING id, name, address, price, number_of_spots, created_at",
        )
        .bind(dto.name.as_deref())
        .bind(dto.address.as_deref())
        .bind(dto.price)
        .bind(lot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update parking lot: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Parking lot not found".to_string()))?;

        self.to_response(lot).await
    }

    /// Delete a lot and, explicitly, its spots and their reservation
    /// history. Refused while any spot is occupied.
    pub async fn delete(&self, lot_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM parking_lots WHERE id = ?1",
        )
        .bind(lot_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if exists == 0 {
            return Err(AppError::NotFound("Parking lot not found".to_string()));
        }

        let occupied = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM parking_spots WHERE lot_id = ?1 AND status = 'occupied'",
        )
        .bind(lot_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if occupied > 0 {
            return Err(AppError::Conflict(
                "Cannot delete a lot while spots are occupied".to_string(),
            ));
        }

        sqlx::query(
            "DELETE FROM reservations \
             WHERE spot_id IN (SELECT id FROM parking_spots WHERE lot_id = ?1)",
        )
        .bind(lot_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM parking_spots WHERE lot_id = ?1")
            .bind(lot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query("DELETE FROM parking_lots WHERE id = ?1")
            .bind(lot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        self.cache.invalidate(lot_id).await;
        tracing::info!("Parking lot deleted: id={}", lot_id);

        Ok(())
    }

    /// List all spots of one lot, in label order
    pub async fn list_spots(&self, lot_id: Uuid) -> Result<Vec<SpotResponseDto>> {
        self.find_lot(lot_id).await?;

        let spots = sqlx::query_as::<_, ParkingSpot>(
            "SELECT id, lot_id, position, spot_number, status, created_at \
             FROM parking_spots WHERE lot_id = ?1 ORDER BY position",
        )
        .bind(lot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list spots: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(spots.into_iter().map(SpotResponseDto::from).collect())
    }

    /// Detailed view of one spot with its lot and, when occupied, the
    /// active reservation and holder
    pub async fn spot_detail(&self, spot_id: Uuid) -> Result<SpotDetailDto> {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            "SELECT id, lot_id, position, spot_number, status, created_at \
             FROM parking_spots WHERE id = ?1",
        )
        .bind(spot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Parking spot not found".to_string()))?;

        let lot = self.find_lot(spot.lot_id).await?;

        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT id, spot_id, user_id, start_time, end_time, cost, status, created_at \
             FROM reservations WHERE spot_id = ?1 AND status = 'active' LIMIT 1",
        )
        .bind(spot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let user = match &reservation {
            Some(reservation) => sqlx::query_as::<_, User>(
                "SELECT id, username, email, password_hash, role, created_at \
                 FROM users WHERE id = ?1",
            )
            .bind(reservation.user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?,
            None => None,
        };

        let spot_number = spot.spot_number.clone();
        let lot_name = lot.name.clone();

        Ok(SpotDetailDto {
            spot: spot.into(),
            lot: SpotLotInfoDto {
                id: lot.id,
                name: lot.name,
                price: lot.price,
            },
            reservation: reservation
                .map(|r| ReservationResponseDto::from_parts(r, Some(spot_number), Some(lot_name))),
            user: user.map(UserResponseDto::from),
        })
    }

    /// Occupancy counts for one lot, served from the side cache when a
    /// fresh entry exists and recomputed from the store otherwise.
    async fn availability(&self, lot_id: Uuid) -> Result<LotAvailability> {
        if let Some(cached) = self.cache.get(lot_id).await {
            return Ok(cached);
        }

        let (available_spots, occupied_spots) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT \
               COUNT(*) FILTER (WHERE status = 'available'), \
               COUNT(*) FILTER (WHERE status = 'occupied') \
             FROM parking_spots WHERE lot_id = ?1",
        )
        .bind(lot_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let availability = LotAvailability {
            available_spots,
            occupied_spots,
        };
        self.cache.store(lot_id, availability).await;

        Ok(availability)
    }

    async fn find_lot(&self, lot_id: Uuid) -> Result<ParkingLot> {
        sqlx::query_as::<_, ParkingLot>(
            "SELECT id, name, address, price, number_of_spots, created_at \
             FROM parking_lots WHERE id = ?1",
        )
        .bind(lot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Parking lot not found".to_string()))
    }

    async fn to_response(&self, lot: ParkingLot) -> Result<LotResponseDto> {
        let availability = self.availability(lot.id).await?;

        Ok(LotResponseDto {
            id: lot.id,
            name: lot.name,
            address: lot.address,
            price: lot.price,
            number_of_spots: lot.number_of_spots,
            available_spots: availability.available_spots,
            occupied_spots: availability.occupied_spots,
            created_at: lot.created_at,
        })
    }
}

/// Label for the spot at a 1-based creation index: 10 slots per letter
/// group, so A1..A10, B1..B10, and from the 27th group onwards AA1, AB1, …
pub(crate) fn spot_label(position: u32) -> String {
    let group = (position - 1) / SPOTS_PER_LABEL_GROUP;
    let slot = position - group * SPOTS_PER_LABEL_GROUP;
    format!("{}{}", letter_group(group), slot)
}

/// Bijective base-26 letter sequence: A..Z, AA, AB, …
fn letter_group(mut group: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (group % 26) as u8);
        if group < 26 {
            break;
        }
        group = group / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("label letters are ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lots::cache::LotStatusCache;
    use crate::shared::test_helpers::{seed_user, test_pool};
    use crate::features::auth::model::Role;
    use std::time::Duration;

    fn lot_dto(spots: u32) -> CreateLotDto {
        CreateLotDto {
            name: "Central Garage".to_string(),
            address: "1 Main St".to_string(),
            price: 10.0,
            number_of_spots: spots,
        }
    }

    fn service(pool: SqlitePool) -> LotService {
        // Zero TTL keeps the occupancy reads deterministic in tests
        LotService::new(pool, Arc::new(LotStatusCache::new(Duration::ZERO)))
    }

    #[test]
    fn labels_follow_ten_per_letter_group() {
        assert_eq!(spot_label(1), "A1");
        assert_eq!(spot_label(9), "A9");
        assert_eq!(spot_label(10), "A10");
        assert_eq!(spot_label(11), "B1");
        assert_eq!(spot_label(12), "B2");
        assert_eq!(spot_label(260), "Z10");
        assert_eq!(spot_label(261), "AA1");
    }

    #[tokio::test]
    async fn create_generates_spots_with_labels() {
        let pool = test_pool().await;
        let service = service(pool.clone());

        let lot = service.create(lot_dto(12)).await.unwrap();
        assert_eq!(lot.number_of_spots, 12);
        assert_eq!(lot.available_spots, 12);
        assert_eq!(lot.occupied_spots, 0);

        let spots = service.list_spots(lot.id).await.unwrap();
        let labels: Vec<&str> = spots.iter().map(|s| s.spot_number.as_str()).collect();
        assert_eq!(
            labels,
            vec!["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "B1", "B2"]
        );
        assert!(spots.iter().all(|s| s.status == SpotStatus::Available));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let pool = test_pool().await;
        let service = service(pool);

        let mut dto = lot_dto(5);
        dto.price = 0.0;
        assert!(matches!(
            service.create(dto).await,
            Err(AppError::Validation(_))
        ));

        let mut dto = lot_dto(5);
        dto.number_of_spots = 0;
        assert!(matches!(
            service.create(dto).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_is_partial_and_checks_existence() {
        let pool = test_pool().await;
        let service = service(pool);

        let lot = service.create(lot_dto(3)).await.unwrap();
        let updated = service
            .update(
                lot.id,
                UpdateLotDto {
                    name: None,
                    address: None,
                    price: Some(12.5),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Central Garage");
        assert_eq!(updated.price, 12.5);
        assert_eq!(updated.number_of_spots, 3);

        let missing = service
            .update(
                Uuid::new_v4(),
                UpdateLotDto {
                    name: Some("Ghost".to_string()),
                    address: None,
                    price: None,
                },
            )
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_refuses_occupied_and_cascades_otherwise() {
        let pool = test_pool().await;
        let service = service(pool.clone());

        let lot = service.create(lot_dto(2)).await.unwrap();
        let spots = service.list_spots(lot.id).await.unwrap();
        let user_id = seed_user(&pool, "dana", "dana@example.net", Role::User).await;

        // Occupy one spot directly and give it a completed reservation on file
        sqlx::query("UPDATE parking_spots SET status = 'occupied' WHERE id = ?1")
            .bind(spots[0].id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            service.delete(lot.id).await,
            Err(AppError::Conflict(_))
        ));

        sqlx::query("UPDATE parking_spots SET status = 'available' WHERE id = ?1")
            .bind(spots[0].id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO reservations (id, spot_id, user_id, start_time, end_time, cost, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'completed', ?7)",
        )
        .bind(Uuid::new_v4())
        .bind(spots[0].id)
        .bind(user_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .bind(5.0)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        service.delete(lot.id).await.unwrap();

        let remaining_spots =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parking_spots WHERE lot_id = ?1")
                .bind(lot.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        let remaining_reservations =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reservations")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(remaining_spots, 0);
        assert_eq!(remaining_reservations, 0);

        assert!(matches!(
            service.delete(lot.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn spot_detail_includes_lot_and_active_holder() {
        let pool = test_pool().await;
        let service = service(pool.clone());

        let lot = service.create(lot_dto(1)).await.unwrap();
        let spots = service.list_spots(lot.id).await.unwrap();
        let user_id = seed_user(&pool, "erin", "erin@example.net", Role::User).await;

        sqlx::query("UPDATE parking_spots SET status = 'occupied' WHERE id = ?1")
            .bind(spots[0].id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO reservations (id, spot_id, user_id, start_time, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
        )
        .bind(Uuid::new_v4())
        .bind(spots[0].id)
        .bind(user_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        let detail = service.spot_detail(spots[0].id).await.unwrap();
        assert_eq!(detail.lot.name, "Central Garage");
        assert_eq!(detail.spot.spot_number, "A1");
        let holder = detail.user.unwrap();
        assert_eq!(holder.username, "erin");
        assert!(detail.reservation.is_some());

        assert!(matches!(
            service.spot_detail(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
