//! Background jobs.
//!
//! The scheduler proper is an external collaborator; the job logic here is
//! directly invocable and a thin in-process worker drives the recurring
//! runs. Jobs only read from the entity store (plus file writes for the
//! CSV export) and never take allocation locks.

pub mod services;
pub mod workers;

pub use services::{CsvExportService, MonthlyReportService, ReminderService};
pub use workers::JobWorker;
