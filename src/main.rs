use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use sqlx::SqlitePool;

use booking_desk::app::{self, Components};
use booking_desk::client::TelegramClient;
use booking_desk::controller::pages::{HealthInfo, LandingPage};
use booking_desk::controller::webhook::WebhookState;
use booking_desk::intake::BookingIntake;
use booking_desk::notify::{self, NotificationDispatcher, NotificationFormatter, SharedSender};
use booking_desk::repo::BookingStore;
use booking_desk::settings::Settings;
use booking_desk::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info", std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load()?;
    let clock = settings.app.clock()?;

    let pool = SqlitePool::connect_with(settings.database.connect_options())
        .await
        .context("Failed to open the booking database")?;
    let store = BookingStore::new(pool, clock);
    // Schema must exist before the listener accepts anything
    store.init().await.context("Failed to initialize storage")?;
    tracing::info!(path = %settings.database.path().display(), "Booking storage ready");

    let sender: Option<SharedSender> = match settings.telegram.bot_token() {
        Some(token) => {
            let client = TelegramClient::new(
                settings.telegram.api_base_url()?,
                settings.telegram.api_timeout(),
                token,
            )?;
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("Telegram bot token is not set, notifications are disabled");
            None
        }
    };
    let recipients = settings.telegram.recipients();
    tracing::info!(
        telegram_configured = sender.is_some(),
        recipients = recipients.len(),
        "Notification channel configured"
    );

    let dispatcher = NotificationDispatcher::new(
        sender.clone(),
        recipients,
        NotificationFormatter::new(settings.app.site_name()),
        settings.telegram.api_timeout(),
    );
    let (queue, worker) = notify::spawn_worker(dispatcher, settings.notifications.queue_capacity());

    let components = Components {
        intake: BookingIntake::new(store.clone(), queue),
        store,
        webhook: WebhookState::new(
            sender.clone(),
            settings.app.secret_key().clone(),
            settings.app.site_name(),
            clock,
        ),
        landing: LandingPage::new(settings.app.templates_dir()),
        health: HealthInfo {
            clock,
            telegram_configured: sender.is_some(),
            database_path: settings.database.path().to_path_buf(),
        },
    };

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!(addr = ?listener.local_addr()?, "Starting HTTP server");

    app::run(listener, components)?
        .await
        .context("Failed to run app")?;

    // The server has dropped every queue handle by now
    tracing::info!("Server stopped, draining pending notifications");
    notify::drain_worker(worker, settings.notifications.drain_timeout()).await;

    Ok(())
}
