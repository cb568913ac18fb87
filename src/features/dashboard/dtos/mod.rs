pub mod dashboard_dto;

pub use dashboard_dto::{
    ChartQueryParams, ChartsDto, DailyReservationsDto, DailyRevenueDto, LotOccupancyDto,
    LotRevenueDto, SummaryDto,
};
