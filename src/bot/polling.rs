use crate::bot::BotHandler;
use crate::telegram::TelegramClient;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{error, info, warn};

const POLL_TIMEOUT_SECS: u64 = 30;
const ERROR_PAUSE: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// Long-polls Telegram and hands every update to the handler until
/// `shutdown` resolves, then lets in-flight replies finish.
pub async fn run_polling<F>(client: &TelegramClient, handler: Arc<BotHandler>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;
    let mut replies = JoinSet::new();

    info!("bot polling started");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            polled = client.get_updates(offset, POLL_TIMEOUT_SECS) => match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        handler.dispatch(update, &mut replies);
                    }
                }
                Err(e) => {
                    warn!("getUpdates failed: {e}");
                    tokio::time::sleep(ERROR_PAUSE).await;
                }
            }
        }

        while let Some(done) = replies.try_join_next() {
            if let Err(e) = done {
                error!("reply task failed: {e}");
            }
        }
    }

    info!(pending = replies.len(), "bot polling stopped");
    drain_replies(&mut replies, SHUTDOWN_GRACE).await;
}

/// Waits up to `grace` for every reply, then aborts the rest.
/// Returns how many were aborted.
pub async fn drain_replies(replies: &mut JoinSet<()>, grace: Duration) -> usize {
    let finished = timeout(grace, async {
        while let Some(done) = replies.join_next().await {
            if let Err(e) = done {
                error!("reply task failed: {e}");
            }
        }
    })
    .await;

    if finished.is_ok() {
        return 0;
    }

    let aborted = replies.len();
    warn!(aborted, "replies still running at shutdown, aborting");
    replies.abort_all();
    while replies.join_next().await.is_some() {}
    aborted
}
