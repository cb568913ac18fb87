//! Admin dashboard aggregations.
//!
//! Pure read-side computations over the entity store: counts, revenue,
//! trailing per-day buckets and per-lot breakdowns.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/summary` | admin | Headline counters |
//! | GET | `/api/admin/charts` | admin | Chart data |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::DashboardService;
