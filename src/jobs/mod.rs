mod price_watch;
mod scheduled_search;
mod search;

pub use price_watch::PriceWatchJob;
pub use scheduled_search::ScheduledSearchJob;
pub use search::{results_file_stem, SearchJob, SearchOutcome, SearchRequest};

use crate::errors::JobError;
use async_trait::async_trait;

/// A unit of work the ticker can repeat.
#[async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<(), JobError>;
}
