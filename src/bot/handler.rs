use crate::bot::conversation::{parse_input, Action, Command, ConversationKey, Conversations, Input};
use crate::jobs::{results_file_stem, SearchJob, SearchOutcome, SearchRequest};
use crate::notifier::Notifier;
use crate::telegram::Update;
use crate::templates;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

pub struct BotHandler {
    conversations: Conversations,
    notifier: Notifier,
    search: SearchJob,
}

impl BotHandler {
    pub fn new(notifier: Notifier, search: SearchJob) -> Self {
        Self {
            conversations: Conversations::new(),
            notifier,
            search,
        }
    }

    #[cfg(test)]
    pub fn conversations(&self) -> &Conversations {
        &self.conversations
    }

    /// Applies the update to the sender's conversation and spawns the
    /// resulting reply into `replies`. Updates are applied in arrival order,
    /// replies run concurrently. Returns whether a reply was spawned.
    pub fn dispatch(self: &Arc<Self>, update: Update, replies: &mut JoinSet<()>) -> bool {
        let Some(message) = update.message else {
            return false;
        };
        let Some(text) = message.text else {
            return false;
        };

        let key = ConversationKey {
            chat_id: message.chat.id,
            user_id: message.from.as_ref().map(|u| u.id).unwrap_or(message.chat.id),
        };

        let input = parse_input(&text);
        if let Input::Command(Command::Unknown(name)) = &input {
            debug!(chat_id = key.chat_id, command = %name, "unknown command");
        }

        let action = self.conversations.apply(key, input);
        debug!(
            chat_id = key.chat_id,
            user_id = key.user_id,
            message_id = message.message_id,
            username = message.from.as_ref().and_then(|u| u.username.as_deref()),
            ?action,
            "update dispatched"
        );

        if action == Action::Ignore {
            return false;
        }

        let handler = Arc::clone(self);
        replies.spawn(async move {
            handler.perform(key.chat_id.to_string(), action).await;
        });
        true
    }

    async fn perform(&self, chat_id: String, action: Action) {
        match action {
            Action::Greet => self.notifier.send_text(&chat_id, templates::GREETING).await,
            Action::AskQuery => self.notifier.send_text(&chat_id, templates::ASK_QUERY).await,
            Action::Cancelled => self.notifier.send_text(&chat_id, templates::CANCELLED).await,
            Action::Hint => self.notifier.send_text(&chat_id, templates::IDLE_HINT).await,
            Action::RunSearch(query) => self.search_and_reply(&chat_id, &query).await,
            Action::Ignore => {}
        }
    }

    async fn search_and_reply(&self, chat_id: &str, query: &str) {
        info!(chat_id, query, "search requested");
        self.notifier
            .send_html(chat_id, &templates::searching(query).into_string())
            .await;

        let request = SearchRequest {
            query: query.to_string(),
            timestamped: true,
            file_stem: results_file_stem(query),
        };

        let report = match self.search.run(&request).await {
            Ok(SearchOutcome::Found(report)) => report,
            Ok(SearchOutcome::Empty) => {
                self.notifier.send_text(chat_id, templates::NO_RESULTS).await;
                return;
            }
            Err(e) => {
                error!(chat_id, query, "search failed: {e}");
                self.notifier.send_text(chat_id, templates::SEARCH_FAILED).await;
                return;
            }
        };

        self.notifier
            .send_html(
                chat_id,
                &templates::stats_summary(query, &report.stats).into_string(),
            )
            .await;

        let caption = templates::results_caption(report.results.len(), query);
        self.notifier.send_file(chat_id, &report.file, &caption).await;

        if let Err(e) = tokio::fs::remove_file(&report.file).await {
            warn!(file = %report.file.display(), "could not remove export: {e}");
        }
    }
}
