use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reservations::models::ReservationHistory;
use crate::features::reservations::services::ReservationService;
use crate::features::users::services::UserService;

const CSV_HEADERS: [&str; 8] = [
    "Reservation ID",
    "Spot Number",
    "Lot Name",
    "Start Time",
    "End Time",
    "Cost",
    "Status",
    "Created At",
];

/// On-demand CSV export of one user's full reservation history.
///
/// Runs off the request path; the handler spawns it and only acknowledges
/// that the job started.
pub struct CsvExportService {
    users: Arc<UserService>,
    reservations: Arc<ReservationService>,
    export_dir: PathBuf,
}

impl CsvExportService {
    pub fn new(
        users: Arc<UserService>,
        reservations: Arc<ReservationService>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            users,
            reservations,
            export_dir: export_dir.into(),
        }
    }

    /// Write the user's history to `<export_dir>/reservations_<username>_<date>.csv`
    /// and return the path.
    pub async fn export_user_history(&self, user_id: Uuid) -> Result<PathBuf> {
        let user = self.users.find_by_id(user_id).await?;
        let rows = self.reservations.history(user_id).await?;

        let data = render_csv(&rows)?;

        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create export dir: {}", e)))?;

        let filename = format!(
            "reservations_{}_{}.csv",
            user.username,
            Utc::now().format("%Y%m%d")
        );
        let path = self.export_dir.join(filename);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write export: {}", e)))?;

        tracing::info!(
            "Exported {} reservations for {} to {}",
            rows.len(),
            user.username,
            path.display()
        );

        Ok(path)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

/// Render history rows as CSV bytes, newest first, one row per reservation
pub(crate) fn render_csv(rows: &[ReservationHistory]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

    for row in rows {
        writer
            .write_record(&[
                row.id.to_string(),
                row.spot_number.clone(),
                row.lot_name.clone(),
                row.start_time.to_rfc3339(),
                row.end_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
                row.cost.map(|c| format!("{:.2}", c)).unwrap_or_default(),
                row.status.as_str().to_string(),
                row.created_at.to_rfc3339(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::features::lots::cache::LotStatusCache;
    use crate::features::lots::dtos::CreateLotDto;
    use crate::features::lots::services::LotService;
    use crate::features::reservations::models::ReservationStatus;
    use crate::shared::test_helpers::{seed_user, test_pool};
    use chrono::TimeZone;

    #[test]
    fn csv_has_documented_columns_and_formats() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 6, 1, 9, 30, 0).unwrap();
        let rows = vec![
            ReservationHistory {
                id: Uuid::new_v4(),
                spot_number: "A1".to_string(),
                lot_name: "Central Garage".to_string(),
                start_time: start,
                end_time: Some(end),
                cost: Some(15.0),
                status: ReservationStatus::Completed,
                created_at: start,
            },
            ReservationHistory {
                id: Uuid::new_v4(),
                spot_number: "A2".to_string(),
                lot_name: "Central Garage".to_string(),
                start_time: end,
                end_time: None,
                cost: None,
                status: ReservationStatus::Active,
                created_at: end,
            },
        ];

        let data = render_csv(&rows).unwrap();
        let text = String::from_utf8(data).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Reservation ID,Spot Number,Lot Name,Start Time,End Time,Cost,Status,Created At"
        );
        assert!(lines[1].contains("A1"));
        assert!(lines[1].contains("15.00"));
        assert!(lines[1].contains("completed"));
        // Active rows leave end time and cost empty
        assert!(lines[2].contains(",,"));
        assert!(lines[2].contains("active"));
    }

    #[tokio::test]
    async fn export_writes_a_file_with_the_user_history() {
        let pool = test_pool().await;
        let users = Arc::new(UserService::new(pool.clone()));
        let reservations = Arc::new(ReservationService::new(pool.clone()));
        let lots = LotService::new(
            pool.clone(),
            Arc::new(LotStatusCache::new(std::time::Duration::ZERO)),
        );

        let lot = lots
            .create(CreateLotDto {
                name: "Central Garage".to_string(),
                address: "1 Main St".to_string(),
                price: 10.0,
                number_of_spots: 1,
            })
            .await
            .unwrap();
        let user_id = seed_user(&pool, "grace", "grace@example.net", Role::User).await;
        let opened = reservations.open(user_id, lot.id).await.unwrap();
        reservations.close(user_id, opened.id).await.unwrap();

        let export_dir = std::env::temp_dir().join(format!("parkwise-export-{}", Uuid::new_v4()));
        let service = CsvExportService::new(users, reservations, &export_dir);

        let path = service.export_user_history(user_id).await.unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.starts_with("Reservation ID,"));
        assert!(contents.contains("Central Garage"));
        assert!(contents.contains("A1"));

        let missing = service.export_user_history(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        tokio::fs::remove_dir_all(&export_dir).await.ok();
    }
}
