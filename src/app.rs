use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{web, App, HttpResponse, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::controller::pages::{self, HealthInfo, LandingPage};
use crate::controller::webhook::{self, WebhookState};
use crate::controller::bookings;
use crate::error::{RestError, RestResult};
use crate::intake::BookingIntake;
use crate::repo::BookingStore;

/// Shared components handed to every worker of the HTTP server
pub struct Components {
    pub store: BookingStore,
    pub intake: BookingIntake,
    pub webhook: WebhookState,
    pub landing: LandingPage,
    pub health: HealthInfo,
}

async fn not_found() -> RestResult<HttpResponse> {
    Err(RestError::NotFound("Not Found".into()))
}

/// Run the application on a specified TCP listener.
///
/// The store must already be initialized.
pub fn run(listener: TcpListener, components: Components) -> anyhow::Result<Server> {
    // Wrap application data
    let store = web::Data::new(components.store);
    let intake = web::Data::new(components.intake);
    let webhook_state = web::Data::new(components.webhook);
    let landing = web::Data::new(components.landing);
    let health = web::Data::new(components.health);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|e, _| RestError::from_json_error(e).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|e, _| RestError::from_query_error(e).into()),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|e, _| RestError::from_path_error(e).into()),
            )
            .app_data(store.clone())
            .app_data(intake.clone())
            .app_data(webhook_state.clone())
            .app_data(landing.clone())
            .app_data(health.clone())
            .service(pages::index)
            .service(pages::health)
            .service(bookings::scope())
            .service(webhook::receive)
            .default_service(web::to(not_found))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
