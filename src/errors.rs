// errors.rs
use crate::domain::DatasetError;
use crate::scraper::ScraperError;
use crate::spreadsheets::ExportError;

/// Everything that can abort one job run. Delivery failures are not here:
/// the notifier logs and drops them.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Scrape(#[from] ScraperError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Job timed out after {0:?}")]
    TimedOut(std::time::Duration),
}
