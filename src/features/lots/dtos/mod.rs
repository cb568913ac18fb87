pub mod lot_dto;

pub use lot_dto::{
    CreateLotDto, LotResponseDto, SpotDetailDto, SpotLotInfoDto, SpotResponseDto, UpdateLotDto,
};
