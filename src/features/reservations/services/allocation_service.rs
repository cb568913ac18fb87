use sqlx::{FromRow, Sqlite, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Identity of a spot the allocator just claimed
#[derive(Debug, Clone, FromRow)]
pub struct AllocatedSpot {
    pub id: Uuid,
    pub spot_number: String,
}

/// Picks and claims a free spot for a new reservation.
///
/// The allocator only flips spot status; creating the reservation record is
/// the lifecycle manager's job. Both run inside the caller's transaction so
/// a claimed spot without a reservation (or the reverse) can never be
/// observed.
pub struct SpotAllocator;

impl SpotAllocator {
    /// Claim the lowest-position available spot in the lot.
    ///
    /// The status guard on the UPDATE makes the claim atomic: of two
    /// concurrent requests racing for the same spot, exactly one matches a
    /// row and the other falls through to `NoAvailability`.
    pub async fn allocate(
        tx: &mut Transaction<'_, Sqlite>,
        lot_id: Uuid,
    ) -> Result<AllocatedSpot> {
        let claimed = sqlx::query_as::<_, AllocatedSpot>(
            "UPDATE parking_spots \
             SET status = 'occupied' \
             WHERE id = ( \
                 SELECT id FROM parking_spots \
                 WHERE lot_id = ?1 AND status = 'available' \
                 ORDER BY position \
                 LIMIT 1 \
             ) \
             AND status = 'available' \
             RETURNING id, spot_number",
        )
        .bind(lot_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to claim a spot in lot {}: {:?}", lot_id, e);
            AppError::Database(e)
        })?;

        match claimed {
            Some(spot) => Ok(spot),
            None => {
                let lot_exists = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM parking_lots WHERE id = ?1",
                )
                .bind(lot_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(AppError::Database)?;

                if lot_exists == 0 {
                    Err(AppError::NotFound("Parking lot not found".to_string()))
                } else {
                    Err(AppError::NoAvailability(
                        "No available spots in this lot".to_string(),
                    ))
                }
            }
        }
    }
}
