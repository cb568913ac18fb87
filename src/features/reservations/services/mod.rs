mod allocation_service;
mod reservation_service;

pub use allocation_service::{AllocatedSpot, SpotAllocator};
pub use reservation_service::ReservationService;
