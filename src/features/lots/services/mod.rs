mod lot_service;

pub use lot_service::LotService;
