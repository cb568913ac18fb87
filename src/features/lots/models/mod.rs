mod parking_lot;
mod parking_spot;

pub use parking_lot::ParkingLot;
pub use parking_spot::{ParkingSpot, SpotStatus};
