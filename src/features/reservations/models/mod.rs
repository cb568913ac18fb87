mod reservation;

pub use reservation::{
    Reservation, ReservationHistory, ReservationStatus, ReservationWithContext,
};
