//! Email body rendering.
//!
//! Templates are embedded at compile time and rendered with Jinja2 syntax;
//! each message is produced in a plain-text and an HTML variant.

use minijinja::{context, Environment};
use std::sync::OnceLock;

use crate::core::error::{AppError, Result};
use crate::modules::mail::client::EmailMessage;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        let templates = [
            (
                "daily_reminder.txt",
                include_str!("../../../templates/mail/daily_reminder.txt.jinja"),
            ),
            (
                "daily_reminder.html",
                include_str!("../../../templates/mail/daily_reminder.html.jinja"),
            ),
            (
                "monthly_report.txt",
                include_str!("../../../templates/mail/monthly_report.txt.jinja"),
            ),
            (
                "monthly_report.html",
                include_str!("../../../templates/mail/monthly_report.html.jinja"),
            ),
        ];
        for (name, content) in templates {
            env.add_template(name, content)
                .expect("embedded template is valid");
        }
        env
    })
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    let template = environment()
        .get_template(name)
        .map_err(|e| AppError::Internal(format!("Template '{}' missing: {}", name, e)))?;

    template
        .render(ctx)
        .map_err(|e| AppError::Internal(format!("Failed to render '{}': {}", name, e)))
}

/// Reminder mail for users without a recent reservation
pub fn daily_reminder_email(to: &str, username: &str) -> Result<EmailMessage> {
    let ctx = context! { username => username };

    Ok(EmailMessage {
        to: to.to_string(),
        subject: "Daily Reminder - Parkwise".to_string(),
        body: render("daily_reminder.txt", ctx.clone())?,
        html: Some(render("daily_reminder.html", ctx)?),
    })
}

/// Last calendar month's usage report for one user
pub fn monthly_report_email(
    to: &str,
    username: &str,
    total_reservations: i64,
    active_reservations: i64,
    total_spent: f64,
) -> Result<EmailMessage> {
    let ctx = context! {
        username => username,
        total_reservations => total_reservations,
        active_reservations => active_reservations,
        total_spent => format!("{:.2}", total_spent),
    };

    Ok(EmailMessage {
        to: to.to_string(),
        subject: "Monthly Report - Parkwise".to_string(),
        body: render("monthly_report.txt", ctx.clone())?,
        html: Some(render("monthly_report.html", ctx)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_reminder_renders_both_variants() {
        let message = daily_reminder_email("alice@example.net", "alice").unwrap();
        assert_eq!(message.to, "alice@example.net");
        assert!(message.body.contains("Hello alice,"));
        assert!(message.html.unwrap().contains("<strong>Book a spot now!</strong>"));
    }

    #[test]
    fn monthly_report_formats_money_with_two_decimals() {
        let message =
            monthly_report_email("bob@example.net", "bob", 4, 1, 12.5).unwrap();
        assert!(message.body.contains("Total Reservations: 4"));
        assert!(message.body.contains("Total Spent: $12.50"));
        assert!(message.html.unwrap().contains("$12.50"));
    }
}
