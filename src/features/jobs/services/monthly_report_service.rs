use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::jobs::services::reminder_service::JobRunReport;
use crate::features::users::services::UserService;
use crate::modules::mail::{templates, Mailer};

/// Monthly report job: every user gets last calendar month's usage stats.
pub struct MonthlyReportService {
    pool: SqlitePool,
    users: Arc<UserService>,
    mailer: Arc<dyn Mailer>,
}

impl MonthlyReportService {
    pub fn new(pool: SqlitePool, users: Arc<UserService>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            pool,
            users,
            mailer,
        }
    }

    pub async fn send_monthly_reports(&self) -> Result<JobRunReport> {
        self.send_reports_for(Utc::now().date_naive()).await
    }

    pub(crate) async fn send_reports_for(&self, today: NaiveDate) -> Result<JobRunReport> {
        let (start, end) = previous_month_range(today);
        let recipients = self.users.list_regular().await?;

        let mut report = JobRunReport::default();
        for user in recipients {
            let (total, active, spent) = sqlx::query_as::<_, (i64, i64, f64)>(
                "SELECT COUNT(*), \
                        COUNT(*) FILTER (WHERE status = 'active'), \
                        COALESCE(SUM(cost), 0.0) \
                 FROM reservations \
                 WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3",
            )
            .bind(user.id)
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

            let message =
                templates::monthly_report_email(&user.email, &user.username, total, active, spent)?;
            match self.mailer.send(&message).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Monthly report mail to {} failed: {}", user.email, e);
                }
            }
        }

        tracing::info!(
            "Monthly reports finished: sent={}, failed={}",
            report.sent,
            report.failed
        );
        Ok(report)
    }
}

/// Half-open UTC range covering the calendar month before the given date:
/// [first of last month, first of this month)
pub(crate) fn previous_month_range(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let first_of_this = today.with_day(1).expect("every month has a first day");
    let (year, month) = if first_of_this.month() == 1 {
        (first_of_this.year() - 1, 12)
    } else {
        (first_of_this.year(), first_of_this.month() - 1)
    };
    let first_of_last = NaiveDate::from_ymd_opt(year, month, 1).expect("first of month exists");

    (day_start(first_of_last), day_start(first_of_this))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight exists"))
}
