use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use tokio::time::interval;

use crate::core::config::JobsConfig;
use crate::features::jobs::services::{MonthlyReportService, ReminderService};

/// Background worker that stands in for the external scheduler: it ticks
/// on a fixed interval and fires the daily reminder run when the date
/// rolls over and the monthly report run when the calendar month does.
///
/// Job errors are logged and the loop continues; a failed run is retried
/// at the next rollover, never mid-day.
pub struct JobWorker {
    reminder_service: Arc<ReminderService>,
    monthly_report_service: Arc<MonthlyReportService>,
    tick: Duration,
}

impl JobWorker {
    pub fn new(
        reminder_service: Arc<ReminderService>,
        monthly_report_service: Arc<MonthlyReportService>,
        config: &JobsConfig,
    ) -> Self {
        Self {
            reminder_service,
            monthly_report_service,
            tick: Duration::from_secs(config.tick_secs),
        }
    }

    /// Run the worker loop; never returns
    pub async fn run(&self) {
        tracing::info!("Starting job worker (tick every {:?})", self.tick);

        let mut ticker = interval(self.tick);
        // Initialized to now so nothing fires at boot
        let mut last_reminder_date = Utc::now().date_naive();
        let mut last_report_month = month_of(last_reminder_date);

        loop {
            ticker.tick().await;
            let today = Utc::now().date_naive();

            if today != last_reminder_date {
                last_reminder_date = today;
                match self.reminder_service.send_daily_reminders().await {
                    Ok(report) => tracing::info!(
                        "Daily reminder run: sent={}, failed={}",
                        report.sent,
                        report.failed
                    ),
                    Err(e) => tracing::error!("Daily reminder run failed: {:?}", e),
                }
            }

            if month_of(today) != last_report_month {
                last_report_month = month_of(today);
                match self.monthly_report_service.send_monthly_reports().await {
                    Ok(report) => tracing::info!(
                        "Monthly report run: sent={}, failed={}",
                        report.sent,
                        report.failed
                    ),
                    Err(e) => tracing::error!("Monthly report run failed: {:?}", e),
                }
            }
        }
    }
}

fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
