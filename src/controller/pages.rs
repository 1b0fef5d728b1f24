use std::path::{Path, PathBuf};

use actix_web::{get, web, HttpResponse, Responder};

use chrono::{FixedOffset, Utc};

use serde::Serialize;

const FALLBACK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>TinaBorke.Art</title>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body>
    <h1>TinaBorke.Art - Скоро здесь будет красивый сайт!</h1>
    <p>API работает. Добавьте файлы в папку templates и static.</p>
</body>
</html>
"#;

/// Where the landing page comes from
#[derive(Debug, Clone)]
pub struct LandingPage {
    templates_dir: Option<PathBuf>,
}

impl LandingPage {
    pub fn new(templates_dir: Option<&Path>) -> Self {
        Self {
            templates_dir: templates_dir.map(Path::to_path_buf),
        }
    }

    async fn load(&self) -> Option<String> {
        let template = self.templates_dir.as_ref()?.join("index.html");
        match tokio::fs::read_to_string(&template).await {
            Ok(page) => Some(page),
            Err(error) => {
                tracing::debug!(path = %template.display(), %error, "Landing page template unavailable");
                None
            }
        }
    }
}

/// Facts reported by the health check
#[derive(Debug, Clone)]
pub struct HealthInfo {
    pub clock: FixedOffset,
    pub telegram_configured: bool,
    pub database_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    timestamp: String,
    version: &'static str,
    telegram_configured: bool,
    database_file_exists: bool,
}

#[tracing::instrument(name = "Landing page", skip(landing))]
#[get("/")]
pub async fn index(landing: web::Data<LandingPage>) -> impl Responder {
    let page = landing
        .load()
        .await
        .unwrap_or_else(|| FALLBACK_PAGE.to_string());

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// Health-check endpoint, always 200
#[tracing::instrument(name = "Health check", skip(info))]
#[get("/health")]
pub async fn health(info: web::Data<HealthInfo>) -> impl Responder {
    let database_file_exists = tokio::fs::try_exists(&info.database_path)
        .await
        .unwrap_or(false);

    HttpResponse::Ok().json(HealthReport {
        status: "healthy",
        timestamp: Utc::now().with_timezone(&info.clock).to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        telegram_configured: info.telegram_configured,
        database_file_exists,
    })
}
