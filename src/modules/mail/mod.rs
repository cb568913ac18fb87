pub mod client;
pub mod templates;

pub use client::{EmailMessage, HttpMailClient, Mailer};
