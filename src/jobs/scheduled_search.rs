use crate::errors::JobError;
use crate::jobs::search::{SearchJob, SearchOutcome, SearchRequest};
use crate::jobs::Job;
use crate::notifier::{NotificationMessage, Notifier};
use crate::templates;
use async_trait::async_trait;
use tracing::info;

/// Runs one fixed query and sends the export to a fixed chat.
pub struct ScheduledSearchJob {
    search: SearchJob,
    notifier: Notifier,
    chat_id: String,
    request: SearchRequest,
}

impl ScheduledSearchJob {
    pub fn new(search: SearchJob, notifier: Notifier, chat_id: String, query: String) -> Self {
        Self {
            search,
            notifier,
            chat_id,
            request: SearchRequest {
                query,
                timestamped: false,
                file_stem: "products".to_string(),
            },
        }
    }
}

#[async_trait]
impl Job for ScheduledSearchJob {
    fn name(&self) -> &str {
        "search"
    }

    async fn run(&self) -> Result<(), JobError> {
        // The export is overwritten below, so read the last run first.
        let previous = self.search.previous_export(&self.request.file_stem).await;

        let message = match self.search.run(&self.request).await? {
            SearchOutcome::Empty => NotificationMessage::plain(templates::no_products(&self.request.query)),
            SearchOutcome::Found(report) => {
                if let Some(previous) = previous.filter(|p| !p.is_empty()) {
                    info!(
                        query = %self.request.query,
                        new = report.results.new_links_since(&previous),
                        "listings not seen in the previous run"
                    );
                }

                NotificationMessage::plain(templates::PRODUCTS_FOUND).with_attachment(
                    report.file,
                    templates::results_caption(report.results.len(), &self.request.query),
                )
            }
        };

        self.notifier.notify(&self.chat_id, &message).await;
        Ok(())
    }
}
