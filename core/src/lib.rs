pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

pub use error::{Result, SolarError};
pub use input::{expand_key, infer_month, parse_args, parse_energy, parse_entry, parse_month, parse_weather, ParsedInput};
pub use model::record::{Record, Weather, DEFAULT_MIN_ENERGY};
pub use model::stats::{EnergyStats, Season, SeasonalAverages};
pub use repository::{FileRecordRepository, RecordRepository};
pub use service::record_service::RecordService;
pub use store::RecordStore;
