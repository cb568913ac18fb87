pub(crate) mod export_service;
pub(crate) mod monthly_report_service;
pub(crate) mod reminder_service;

pub use export_service::CsvExportService;
pub use monthly_report_service::MonthlyReportService;
pub use reminder_service::{JobRunReport, ReminderService};
