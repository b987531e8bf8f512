use crate::bot::conversation::{ConversationKey, ConversationState};
use crate::bot::polling::drain_replies;
use crate::bot::BotHandler;
use crate::config::ExportConfig;
use crate::jobs::{ScheduledSearchJob, SearchJob};
use crate::notifier::Notifier;
use crate::scheduler::{run_bounded, RunStatus};
use crate::scraper::ListingSource;
use crate::spreadsheets::ExportFormat;
use crate::telegram::{TextFormat, Update};
use crate::templates;
use crate::tests::utils::{
    temp_dir, text_update, FakeChat, FlakySource, HtmlPageSource, Sent, EMPTY_PAGE, TWO_ITEM_PAGE,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

const CHAT: i64 = 555;
const USER: i64 = 7;

struct Harness {
    handler: Arc<BotHandler>,
    chat: Arc<FakeChat>,
    dir: PathBuf,
    next_update: i64,
}

impl Harness {
    fn new(name: &str, source: Arc<dyn ListingSource>) -> Self {
        let dir = temp_dir(name);
        let chat = Arc::new(FakeChat::default());
        let search = SearchJob::new(
            source,
            ExportConfig {
                output_dir: dir.clone(),
                format: ExportFormat::Csv,
            },
        );
        Self {
            handler: Arc::new(BotHandler::new(Notifier::new(chat.clone()), search)),
            chat,
            dir,
            next_update: 1,
        }
    }

    async fn say(&mut self, user_id: i64, text: &str) {
        let update = text_update(self.next_update, CHAT, user_id, text);
        self.next_update += 1;
        self.deliver(update).await;
    }

    async fn deliver(&self, update: Update) {
        let mut replies = JoinSet::new();
        self.handler.dispatch(update, &mut replies);
        while let Some(done) = replies.join_next().await {
            done.unwrap();
        }
    }

    fn state(&self, user_id: i64) -> ConversationState {
        self.handler.conversations().state(ConversationKey {
            chat_id: CHAT,
            user_id,
        })
    }

    fn exports_left(&self) -> usize {
        std::fs::read_dir(&self.dir).unwrap().count()
    }
}

#[tokio::test]
async fn search_then_cancel_returns_to_idle() {
    let mut h = Harness::new("bot_cancel", Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE)));

    h.say(USER, "/buscar").await;
    assert_eq!(h.state(USER), ConversationState::AwaitingQuery);

    h.say(USER, "/cancel").await;
    assert_eq!(h.state(USER), ConversationState::Idle);

    assert_eq!(
        h.chat.texts(),
        vec![templates::ASK_QUERY.to_string(), templates::CANCELLED.to_string()]
    );
}

#[tokio::test]
async fn full_search_sends_stats_and_csv_then_deletes_it() {
    let source = Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE));
    let mut h = Harness::new("bot_full_search", source.clone());

    h.say(USER, "/start").await;
    h.say(USER, "/buscar").await;
    h.say(USER, "tarja de acero 80 45 22").await;

    assert_eq!(h.state(USER), ConversationState::Idle);
    assert_eq!(
        source.queries.lock().unwrap().clone(),
        vec!["tarja de acero 80 45 22".to_string()]
    );

    let sent = h.chat.sent();
    assert_eq!(sent.len(), 5, "{sent:#?}");

    assert!(matches!(&sent[0], Sent::Text { text, .. } if text == templates::GREETING));
    assert!(matches!(&sent[1], Sent::Text { text, .. } if text == templates::ASK_QUERY));

    match &sent[2] {
        Sent::Text { text, format, .. } => {
            assert_eq!(*format, TextFormat::Html);
            assert_eq!(text, "Buscando '<b>tarja de acero 80 45 22</b>'... ⏳");
        }
        other => panic!("expected searching notice, got {other:?}"),
    }

    match &sent[3] {
        Sent::Text { text, format, .. } => {
            assert_eq!(*format, TextFormat::Html);
            assert!(text.contains("Resultados: <code>2</code>"), "{text}");
            assert!(text.contains("Precio promedio: <code>$1,116.50</code>"), "{text}");
        }
        other => panic!("expected stats, got {other:?}"),
    }

    match &sent[4] {
        Sent::File {
            chat_id,
            name,
            caption,
            contents,
        } => {
            assert_eq!(chat_id, &CHAT.to_string());
            assert!(name.starts_with("resultados_tarja_de_acero_80_45_"), "{name}");
            assert!(name.ends_with(".csv"));
            assert_eq!(caption, "📊 2 resultados para 'tarja de acero 80 45 22'");
            assert!(contents.starts_with("Titulo,Precio,Link,fecha_consulta\n"));
            assert!(contents.contains("Producto A,1234.0,/a,"));
            assert!(contents.contains("Producto B,999.0,/b,"));
        }
        other => panic!("expected export, got {other:?}"),
    }

    assert_eq!(h.exports_left(), 0);
}

#[tokio::test]
async fn empty_search_reports_no_results() {
    let mut h = Harness::new("bot_empty", Arc::new(HtmlPageSource::new(EMPTY_PAGE)));

    h.say(USER, "/buscar").await;
    h.say(USER, "unicornio de titanio").await;

    let texts = h.chat.texts();
    assert_eq!(texts.last().map(String::as_str), Some(templates::NO_RESULTS));
    assert!(h.chat.files().is_empty());
    assert_eq!(h.exports_left(), 0);
}

#[tokio::test]
async fn scrape_failure_is_reported_to_the_user() {
    let mut h = Harness::new("bot_failure", Arc::new(FlakySource::new(5, TWO_ITEM_PAGE)));

    h.say(USER, "/buscar").await;
    h.say(USER, "tarja").await;

    assert_eq!(
        h.chat.texts().last().map(String::as_str),
        Some(templates::SEARCH_FAILED)
    );
    assert!(h.chat.files().is_empty());
    assert_eq!(h.state(USER), ConversationState::Idle);
}

#[tokio::test]
async fn idle_text_gets_a_hint() {
    let mut h = Harness::new("bot_hint", Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE)));

    h.say(USER, "hola").await;

    assert_eq!(h.chat.texts(), vec![templates::IDLE_HINT.to_string()]);
}

#[tokio::test]
async fn cancel_while_idle_and_unknown_commands_are_ignored() {
    let mut h = Harness::new("bot_ignored", Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE)));

    h.say(USER, "/cancel").await;
    h.say(USER, "/ayuda").await;

    assert!(h.chat.sent().is_empty());
}

#[tokio::test]
async fn another_user_does_not_consume_the_pending_query() {
    let source = Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE));
    let mut h = Harness::new("bot_two_users", source.clone());

    h.say(USER, "/buscar").await;
    h.say(USER + 1, "tarja").await;

    assert!(source.queries.lock().unwrap().is_empty());
    assert_eq!(h.state(USER), ConversationState::AwaitingQuery);

    h.say(USER, "tarja").await;
    assert_eq!(source.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn updates_without_text_are_skipped() {
    let h = Harness::new("bot_no_text", Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE)));

    let mut update = text_update(1, CHAT, USER, "");
    if let Some(message) = update.message.as_mut() {
        message.text = None;
    }
    let mut replies = JoinSet::new();
    assert!(!h.handler.dispatch(update, &mut replies));

    let no_message = Update {
        update_id: 2,
        message: None,
    };
    assert!(!h.handler.dispatch(no_message, &mut replies));
    assert!(replies.is_empty());
}

#[tokio::test]
async fn shutdown_waits_for_a_search_in_flight() {
    let h = Harness::new("bot_drain", Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE)));
    let mut replies = JoinSet::new();

    h.handler
        .dispatch(text_update(1, CHAT, USER, "/buscar"), &mut replies);
    drain_replies(&mut replies, Duration::from_secs(2)).await;

    assert!(h
        .handler
        .dispatch(text_update(2, CHAT, USER, "tarja"), &mut replies));
    assert_eq!(replies.len(), 1);

    assert_eq!(drain_replies(&mut replies, Duration::from_secs(5)).await, 0);
    assert!(replies.is_empty());
    assert_eq!(h.chat.files().len(), 1);
    assert_eq!(h.exports_left(), 0);
}

#[tokio::test]
async fn replies_past_the_grace_period_are_aborted() {
    let mut replies = JoinSet::new();
    replies.spawn(std::future::pending::<()>());
    replies.spawn(async {});

    let aborted = drain_replies(&mut replies, Duration::from_millis(20)).await;

    assert_eq!(aborted, 1);
    assert!(replies.is_empty());
}

#[tokio::test]
async fn scheduled_search_on_empty_page_sends_no_file() {
    let dir = temp_dir("scheduled_empty");
    let chat = Arc::new(FakeChat::default());
    let search = SearchJob::new(
        Arc::new(HtmlPageSource::new(EMPTY_PAGE)),
        ExportConfig {
            output_dir: dir.clone(),
            format: ExportFormat::Csv,
        },
    );
    let job = ScheduledSearchJob::new(
        search,
        Notifier::new(chat.clone()),
        "42".to_string(),
        "tarja".to_string(),
    );

    assert_eq!(run_bounded(&job, Duration::from_secs(2)).await, RunStatus::Succeeded);

    assert_eq!(chat.texts(), vec![templates::no_products("tarja")]);
    assert!(chat.files().is_empty());
    assert!(!dir.join("products.csv").exists());
}

#[tokio::test]
async fn undeliverable_text_skips_the_attachment() {
    let dir = temp_dir("scheduled_undeliverable");
    let chat = Arc::new(FakeChat::failing());
    let search = SearchJob::new(
        Arc::new(HtmlPageSource::new(TWO_ITEM_PAGE)),
        ExportConfig {
            output_dir: dir.clone(),
            format: ExportFormat::Csv,
        },
    );
    let job = ScheduledSearchJob::new(
        search,
        Notifier::new(chat.clone()),
        "42".to_string(),
        "tarja".to_string(),
    );

    assert_eq!(run_bounded(&job, Duration::from_secs(2)).await, RunStatus::Succeeded);
    assert!(chat.sent().is_empty());
}
