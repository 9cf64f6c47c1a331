use std::sync::Arc;

mod account;
mod booking;
mod session;

use axum::{body::Body, middleware, response::Response, Router};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

pub use session::Context;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] service::ServiceError),

    #[error("Inconsistent id. Got {0} in path but {1} in body")]
    InconsistentId(Uuid, Uuid),

    #[error("Could not serialize response: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Could not build response: {0}")]
    HttpError(#[from] http::Error),
}

fn text_response(status: u16, body: impl Into<Body>) -> Response {
    let mut response = Response::new(body.into());
    *response.status_mut() =
        http::StatusCode::from_u16(status).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
    response
}

fn json_response<T: Serialize>(status: u16, value: &T) -> Result<Response, RestError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::new(serde_json::to_string(value)?))?)
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err @ RestError::InconsistentId(_, _)) => text_response(400, err.to_string()),
        Err(err @ (RestError::SerializationError(_) | RestError::HttpError(_))) => {
            error!("{}", err);
            text_response(500, err.to_string())
        }
        Err(RestError::ServiceError(service::ServiceError::Forbidden)) => {
            text_response(403, Body::empty())
        }
        Err(RestError::ServiceError(service::ServiceError::Unauthorized)) => {
            text_response(401, Body::empty())
        }
        Err(RestError::ServiceError(service::ServiceError::DatabaseQueryError(e))) => {
            error!("Database error: {}", e);
            text_response(500, e.to_string())
        }
        Err(RestError::ServiceError(service::ServiceError::EntityAlreadyExists(id))) => {
            text_response(409, id.to_string())
        }
        Err(RestError::ServiceError(service::ServiceError::EntityNotFound(id))) => {
            text_response(404, id.to_string())
        }
        Err(RestError::ServiceError(err @ service::ServiceError::DateFormatError(_))) => {
            text_response(400, err.to_string())
        }
        Err(RestError::ServiceError(err @ service::ServiceError::ValidationError(_))) => {
            text_response(422, err.to_string())
        }
        Err(RestError::ServiceError(err @ service::ServiceError::IdSetOnCreate)) => {
            text_response(422, err.to_string())
        }
        Err(RestError::ServiceError(err @ service::ServiceError::VersionSetOnCreate)) => {
            text_response(422, err.to_string())
        }
        Err(RestError::ServiceError(err @ service::ServiceError::DateOrderWrong(_, _))) => {
            text_response(422, err.to_string())
        }
        Err(RestError::ServiceError(err @ service::ServiceError::InternalError)) => {
            error!("{}", err);
            text_response(500, err.to_string())
        }
    }
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type BookingService: service::booking::BookingService<Context = Context>
        + Send
        + Sync
        + 'static;
    type AccountService: service::account::AccountService<Context = Context>
        + Send
        + Sync
        + 'static;

    fn booking_service(&self) -> Arc<Self::BookingService>;
    fn account_service(&self) -> Arc<Self::AccountService>;
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Booking backend"),
    nest(
        (path = "/booking", api = booking::BookingApiDoc),
        (path = "/account", api = account::AccountApiDoc),
    )
)]
pub struct ApiDoc;

/// The complete application router including the swagger ui.
pub fn build_router<RestState: RestStateDef>(rest_state: RestState) -> Router {
    Router::new()
        .nest("/booking", booking::generate_route::<RestState>())
        .nest("/account", account::generate_route::<RestState>())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(session::context_extractor))
        .with_state(rest_state)
}

pub async fn start_server<RestState: RestStateDef>(
    rest_state: RestState,
    address: &str,
) -> Result<(), std::io::Error> {
    let app = build_router(rest_state);
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Listening on {}", address);
    axum::serve(listener, app).await
}
