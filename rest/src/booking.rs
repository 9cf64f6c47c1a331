use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use rest_types::{BookingPageTO, BookingQueryTO, BookingTO};
use service::booking::{Booking, BookingFilter, BookingService, PageRequest};
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{error_handler, json_response, text_response, Context, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_bookings::<RestState>))
        .route("/", post(create_booking::<RestState>))
        .route("/{id}", get(get_booking::<RestState>))
        .route("/{id}", put(update_booking::<RestState>))
        .route("/{id}", delete(delete_booking::<RestState>))
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Bookings"],
    params(BookingQueryTO),
    responses(
        (status = 200, description = "Matching bookings of the requested page", body = BookingPageTO),
        (status = 400, description = "Date filter not in dd-MM-yyyy form"),
        (status = 401, description = "Unknown user"),
    ),
)]
pub async fn get_all_bookings<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Query(query): Query<BookingQueryTO>,
) -> Response {
    error_handler(
        (async {
            let page = rest_state
                .booking_service()
                .get_all(
                    &BookingFilter::from(&query),
                    PageRequest::from(&query),
                    context.into(),
                    None,
                )
                .await?;
            json_response(200, &BookingPageTO::from(&page))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Bookings"],
    params(
        ("id", description = "Booking id", example = "1a2b3c4d-5e6f-4a8b-9c0d-e1f2a3b4c5d6"),
    ),
    responses(
        (status = 200, description = "Booking found", body = BookingTO),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
    ),
)]
pub async fn get_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(booking_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let booking = rest_state
                .booking_service()
                .get(booking_id, context.into(), None)
                .await?;
            json_response(200, &BookingTO::from(&booking))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Bookings"],
    request_body = BookingTO,
    responses(
        (status = 201, description = "Booking created", body = BookingTO),
        (status = 403, description = "Booking for another user"),
        (status = 422, description = "Invalid booking"),
    ),
)]
pub async fn create_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(booking): Json<BookingTO>,
) -> Response {
    error_handler(
        (async {
            let booking = rest_state
                .booking_service()
                .create(&Booking::from(&booking), context.into(), None)
                .await?;
            json_response(201, &BookingTO::from(&booking))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Bookings"],
    params(
        ("id", description = "Booking id", example = "1a2b3c4d-5e6f-4a8b-9c0d-e1f2a3b4c5d6"),
    ),
    request_body = BookingTO,
    responses(
        (status = 200, description = "Booking updated", body = BookingTO),
        (status = 400, description = "Id in body differs from the path"),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Invalid booking"),
    ),
)]
pub async fn update_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(booking_id): Path<Uuid>,
    Json(booking): Json<BookingTO>,
) -> Response {
    error_handler(
        (async {
            if !booking.id.is_nil() && booking.id != booking_id {
                return Err(RestError::InconsistentId(booking_id, booking.id));
            }
            let booking = rest_state
                .booking_service()
                .update(booking_id, &Booking::from(&booking), context.into(), None)
                .await?;
            json_response(200, &BookingTO::from(&booking))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Bookings"],
    params(
        ("id", description = "Booking id", example = "1a2b3c4d-5e6f-4a8b-9c0d-e1f2a3b4c5d6"),
    ),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
    ),
)]
pub async fn delete_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(booking_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .booking_service()
                .delete(booking_id, context.into(), None)
                .await?;
            Ok(text_response(204, ""))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_bookings,
        get_booking,
        create_booking,
        update_booking,
        delete_booking,
    ),
    components(schemas(BookingTO, BookingPageTO))
)]
pub struct BookingApiDoc;
