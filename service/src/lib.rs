use std::sync::Arc;

use booking_utils::BookingDateUtilsError;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

pub mod account;
pub mod booking;
pub mod clock;
pub mod permission;
pub mod user_service;
pub mod uuid_service;

pub use permission::MockPermissionService;
pub use permission::PermissionService;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationFailureItem {
    InvalidValue(Arc<str>),
    ModificationNotAllowed(Arc<str>),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Entity {0} already exists")]
    EntityAlreadyExists(Uuid),

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Invalid date format: {0}")]
    DateFormatError(Arc<str>),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("ID cannot be set on create")]
    IdSetOnCreate,

    #[error("Version cannot be set on create")]
    VersionSetOnCreate,

    #[error("Date order wrong. {0} must be before or equal to {1}")]
    DateOrderWrong(Date, Date),

    #[error("Internal error")]
    InternalError,
}

impl From<BookingDateUtilsError> for ServiceError {
    fn from(err: BookingDateUtilsError) -> Self {
        ServiceError::DateFormatError(err.to_string().into())
    }
}
