use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use crate::domain::BookingForm;
use crate::error::{RestError, RestResult};
use crate::intake::BookingIntake;
use crate::repo::BookingStore;

const DEFAULT_LIST_LIMIT: u32 = 100;

#[derive(Debug, Serialize)]
struct CreatedResponse {
    success: bool,
    message: &'static str,
    booking_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<u32>,
}

async fn accept(intake: &BookingIntake, form: BookingForm) -> RestResult<HttpResponse> {
    let accepted = intake.submit(form).await?;

    Ok(HttpResponse::Ok().json(CreatedResponse {
        success: true,
        message: "Заявка успешно создана",
        booking_id: accepted.booking_id,
    }))
}

/// Create endpoint for new bookings
#[tracing::instrument(name = "Create a new booking", skip(intake, form))]
#[post("/booking")]
async fn create(
    intake: web::Data<BookingIntake>,
    form: web::Json<BookingForm>,
) -> RestResult<impl Responder> {
    accept(&intake, form.into_inner()).await
}

/// Same contract as `create`, kept for the site's quick booking form
#[tracing::instrument(name = "Create a quick booking", skip(intake, form))]
#[post("/quick-booking")]
async fn create_quick(
    intake: web::Data<BookingIntake>,
    form: web::Json<BookingForm>,
) -> RestResult<impl Responder> {
    accept(&intake, form.into_inner()).await
}

#[tracing::instrument(name = "Fetch a booking", skip(store))]
#[get("/booking/{id}")]
async fn fetch(store: web::Data<BookingStore>, path: web::Path<(i64,)>) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    let booking = store
        .get(id)
        .await?
        .ok_or_else(|| RestError::NotFound("Заявка не найдена".into()))?;

    Ok(HttpResponse::Ok().json(booking))
}

#[tracing::instrument(name = "List latest bookings", skip(store))]
#[get("/bookings")]
async fn list(
    store: web::Data<BookingStore>,
    query: web::Query<ListQuery>,
) -> RestResult<impl Responder> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let bookings = store.list(limit).await?;

    Ok(HttpResponse::Ok().json(bookings))
}

/// Booking API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(create)
        .service(create_quick)
        .service(fetch)
        .service(list)
}
