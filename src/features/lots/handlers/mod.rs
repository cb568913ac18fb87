pub mod lot_handler;

pub use lot_handler::*;
