pub mod reservation_dto;

pub use reservation_dto::{OpenReservationDto, ReservationResponseDto};
