use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::core::error::Result;
use crate::features::users::services::UserService;
use crate::modules::mail::{templates, Mailer};

/// Outcome of one batch mail run. Failures are counted, never fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobRunReport {
    pub sent: usize,
    pub failed: usize,
}

/// Daily reminder job: users with no reservation created in the trailing
/// inactivity window get a nudge email.
pub struct ReminderService {
    users: Arc<UserService>,
    mailer: Arc<dyn Mailer>,
    inactive_days: i64,
}

impl ReminderService {
    pub fn new(users: Arc<UserService>, mailer: Arc<dyn Mailer>, inactive_days: i64) -> Self {
        Self {
            users,
            mailer,
            inactive_days,
        }
    }

    pub async fn send_daily_reminders(&self) -> Result<JobRunReport> {
        let cutoff = Utc::now() - Duration::days(self.inactive_days);
        let recipients = self.users.inactive_since(cutoff).await?;

        let mut report = JobRunReport::default();
        for user in recipients {
            let message = templates::daily_reminder_email(&user.email, &user.username)?;
            match self.mailer.send(&message).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Reminder mail to {} failed: {}", user.email, e);
                }
            }
        }

        tracing::info!(
            "Daily reminders finished: sent={}, failed={}",
            report.sent,
            report.failed
        );
        Ok(report)
    }
}
