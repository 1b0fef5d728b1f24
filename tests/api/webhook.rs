use std::time::Duration;

use serde_json::json;

use sqlx::SqlitePool;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, BOT_TOKEN, WEBHOOK_SECRET};

fn command_update(chat_id: i64, text: &str) -> serde_json::Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "date": 1717250000,
            "chat": { "id": chat_id, "type": "private" },
            "text": text
        }
    })
}

#[sqlx::test(migrations = false)]
async fn start_command_is_answered(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    Mock::given(path(format!("/bot{}/sendMessage", BOT_TOKEN)))
        .and(method("POST"))
        .and(body_partial_json(json!({ "chat_id": "555" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.telegram_server)
        .await;

    let res = app
        .webhook(Some(WEBHOOK_SECRET), &command_update(555, "/start"))
        .await
        .expect("Failed to execute request");

    assert!(res.status().is_success());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json!({ "status": "ok" }), body);

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn plain_messages_are_ignored(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .webhook(Some(WEBHOOK_SECRET), &command_update(555, "hello there"))
        .await
        .expect("Failed to execute request");

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("ok", body["status"]);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(app.telegram_server.received_requests().await.unwrap().is_empty());

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn wrong_secret_is_refused(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    for secret in [None, Some("guess")] {
        let res = app
            .webhook(secret, &command_update(555, "/start"))
            .await
            .expect("Failed to execute request");

        assert!(res.status().is_success());
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!("error", body["status"]);
        assert!(body["message"].is_string());
    }

    assert!(app.telegram_server.received_requests().await.unwrap().is_empty());

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn malformed_update_reports_error(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .webhook(Some(WEBHOOK_SECRET), &json!({ "message": "not an object" }))
        .await
        .expect("Failed to execute request");

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("error", body["status"]);

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn failed_reply_reports_error(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden: bot was blocked"))
        .mount(&app.telegram_server)
        .await;

    let res = app
        .webhook(Some(WEBHOOK_SECRET), &command_update(555, "/help"))
        .await
        .expect("Failed to execute request");

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("error", body["status"]);
    assert!(body["message"].as_str().unwrap().contains("403"));

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn commands_are_ignored_without_telegram(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn_without_telegram(&pool).await;

    let res = app
        .webhook(Some(WEBHOOK_SECRET), &command_update(555, "/status"))
        .await
        .expect("Failed to execute request");

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("ok", body["status"]);

    Ok(())
}
