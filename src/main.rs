use crate::bot::{run_polling, BotHandler};
use crate::config::{AppConfig, Mode, TimerJobKind};
use crate::jobs::{Job, PriceWatchJob, ScheduledSearchJob, SearchJob};
use crate::notifier::Notifier;
use crate::scheduler::Ticker;
use crate::scraper::{BrowserFetcher, StaticPageFetcher};
use crate::telegram::TelegramClient;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

mod bot;
mod config;
mod domain;
mod errors;
mod jobs;
mod notifier;
mod scheduler;
mod scraper;
mod spreadsheets;
mod telegram;
mod templates;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1️⃣ Environment and logging
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // 2️⃣ Telegram client shared by every sender
    let telegram = Arc::new(
        TelegramClient::new(config.telegram.token.clone(), config.telegram.api_base.clone())
            .context("failed to build Telegram client")?,
    );
    let notifier = Notifier::new(telegram.clone());

    let fetcher = Arc::new(BrowserFetcher::new(
        config.browser.clone(),
        config.search.clone(),
    ));
    let search = SearchJob::new(fetcher, config.export.clone());

    // 3️⃣ Run until Ctrl-C
    match config.mode {
        Mode::Bot => {
            info!("starting in bot mode");
            let handler = Arc::new(BotHandler::new(notifier, search));
            run_polling(&telegram, handler, shutdown_signal()).await;
        }
        Mode::Timer => {
            let chat_id = config
                .telegram
                .chat_id
                .clone()
                .context("CHAT_ID is required in timer mode")?;

            let job: Arc<dyn Job> = match config.timer.job {
                TimerJobKind::PriceWatch => Arc::new(PriceWatchJob::new(
                    Arc::new(StaticPageFetcher::new(config.timer.job_timeout)?),
                    notifier,
                    chat_id,
                    config.timer.watch_url.clone(),
                    config.timer.watch_selector.clone(),
                )),
                TimerJobKind::Search => Arc::new(ScheduledSearchJob::new(
                    search,
                    notifier,
                    chat_id,
                    config.timer.query.clone(),
                )),
            };

            info!(job = job.name(), "starting in timer mode");
            Ticker::new(config.timer.interval, config.timer.job_timeout)
                .run_until(job, shutdown_signal())
                .await;
        }
    }

    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
