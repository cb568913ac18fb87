//! User accounts.
//!
//! Accounts are created by the external auth service; this feature serves
//! the admin listing and the read paths the mail jobs depend on.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/users` | admin | List user accounts |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::UserService;
