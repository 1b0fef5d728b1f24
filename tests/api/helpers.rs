use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;

use reqwest::{Client, Method, Response};

use secrecy::Secret;

use serde::Serialize;

use sqlx::SqlitePool;

use url::Url;

use wiremock::MockServer;

use booking_desk::app::{self, Components};
use booking_desk::client::TelegramClient;
use booking_desk::controller::pages::{HealthInfo, LandingPage};
use booking_desk::controller::webhook::{WebhookState, SECRET_TOKEN_HEADER};
use booking_desk::intake::BookingIntake;
use booking_desk::notify::{
    spawn_worker, NotificationDispatcher, NotificationFormatter, RecipientSet, SharedSender,
};
use booking_desk::repo::BookingStore;

pub const BOT_TOKEN: &str = "123456:TEST-token";
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const ADMIN_ID: &str = "100";
/// Staff list deliberately repeats the admin
pub const STAFF_IDS: &str = "200,100,300";

#[derive(Debug, Default, Serialize)]
pub struct NewBooking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewBooking {
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            name: Some(name.into()),
            phone: Some(phone.into()),
            ..Default::default()
        }
    }
}

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub telegram_server: MockServer,
}

impl TestApp {
    /// Spawn an app instance with notifications delivered to a mock Telegram API
    pub async fn spawn(pool: &SqlitePool) -> Self {
        Self::spawn_with(pool, true).await
    }

    /// Spawn an app instance with no bot token configured
    pub async fn spawn_without_telegram(pool: &SqlitePool) -> Self {
        Self::spawn_with(pool, false).await
    }

    async fn spawn_with(pool: &SqlitePool, telegram_configured: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let clock = FixedOffset::east_opt(3 * 3600).unwrap();
        let api_timeout = Duration::from_secs(3);

        let store = BookingStore::new(pool.clone(), clock);
        store.init().await.expect("Failed to initialize storage");

        let telegram_server = MockServer::start().await;

        let sender: Option<SharedSender> = if telegram_configured {
            let api_base_url =
                Url::parse(&telegram_server.uri()).expect("Failed to parse mock server uri");
            let token = Secret::new(BOT_TOKEN.to_string());
            let client = TelegramClient::new(api_base_url, api_timeout, &token)
                .expect("Failed to create telegram client");
            Some(Arc::new(client))
        } else {
            None
        };

        let dispatcher = NotificationDispatcher::new(
            sender.clone(),
            RecipientSet::parse(ADMIN_ID, STAFF_IDS),
            NotificationFormatter::new("TinaBorke.Art"),
            api_timeout,
        );
        let (queue, _worker) = spawn_worker(dispatcher, 16);

        let components = Components {
            intake: BookingIntake::new(store.clone(), queue),
            store,
            webhook: WebhookState::new(
                sender.clone(),
                Secret::new(WEBHOOK_SECRET.to_string()),
                "TinaBorke.Art",
                clock,
            ),
            landing: LandingPage::new(None),
            health: HealthInfo {
                clock,
                telegram_configured,
                database_path: PathBuf::from("does-not-exist.db"),
            },
        };

        let server = app::run(listener, components).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            client,
            telegram_server,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health").send().await
    }

    pub async fn landing_page(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "").send().await
    }

    pub async fn booking_create(&self, booking: &NewBooking) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/booking")
            .json(booking)
            .send()
            .await
    }

    pub async fn quick_booking_create(&self, booking: &NewBooking) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/quick-booking")
            .json(booking)
            .send()
            .await
    }

    pub async fn booking_fetch(&self, id: i64) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("api/booking/{}", id))
            .send()
            .await
    }

    pub async fn bookings_list(&self, query: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("api/bookings{}", query))
            .send()
            .await
    }

    pub async fn webhook(
        &self,
        secret: Option<&str>,
        update: &serde_json::Value,
    ) -> reqwest::Result<Response> {
        let mut req = self.request(Method::POST, "webhook").json(update);
        if let Some(secret) = secret {
            req = req.header(SECRET_TOKEN_HEADER, secret);
        }
        req.send().await
    }

    /// Create a booking through the API and return its id
    pub async fn create_booking_id(&self, booking: &NewBooking) -> i64 {
        let res = self
            .booking_create(booking)
            .await
            .expect("Failed to execute request");
        assert!(res.status().is_success());

        let body: serde_json::Value = res.json().await.expect("Failed to parse response");
        body["booking_id"].as_i64().expect("Missing booking id")
    }

    /// Wait until the mock Telegram API has seen `count` requests, returning their chat ids
    pub async fn wait_for_messages(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let requests = self.telegram_server.received_requests().await.unwrap();
            if requests.len() >= count {
                return requests
                    .iter()
                    .map(|req| {
                        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
                        body["chat_id"].as_str().unwrap().to_string()
                    })
                    .collect();
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("Telegram API did not receive {} requests in time", count);
    }
}

pub async fn booking_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("select count(*) from bookings")
        .fetch_one(pool)
        .await
        .expect("Failed to count bookings")
}
