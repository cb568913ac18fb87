//! Parking lot and spot management.
//!
//! Lots own a fixed set of spots created with them; labels derive from the
//! creation index (A1..A10, B1..B10, …). Deletion cascades explicitly over
//! spots and reservation history and is refused while any spot is occupied.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/parking-lots` | admin | List lots with occupancy |
//! | POST | `/api/admin/parking-lots` | admin | Create lot + spots |
//! | PUT | `/api/admin/parking-lots/{id}` | admin | Partial update |
//! | DELETE | `/api/admin/parking-lots/{id}` | admin | Delete lot + history |
//! | GET | `/api/admin/spots/{lot_id}` | admin | Spots of a lot |
//! | GET | `/api/admin/spots/{spot_id}/details` | admin | Spot detail |

pub mod cache;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use cache::LotStatusCache;
pub use routes::routes;
pub use services::LotService;
