pub mod dataset;
pub mod listing;
pub mod price;
pub mod stats;

pub use dataset::{build_dataset, DatasetError};
pub use listing::{ListingRecord, ResultSet, Schema, TIMESTAMP_FORMAT, TIMESTAMP_PARSE_FORMAT};
pub use stats::PriceStats;
