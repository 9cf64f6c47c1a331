use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use booking_utils::derive_from_reference;
use dao::MockTransaction;
use mockall::automock;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Display name of the owner. Resolved on reads, ignored on writes.
    pub username: Option<Arc<str>>,
    pub start_date: Date,
    pub end_date: Date,
    pub cost_per_day: f64,
    pub post_code: Arc<str>,
    pub city: Arc<str>,
    pub street: Arc<str>,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::booking::BookingEntity> for Booking {
    fn from(booking: &dao::booking::BookingEntity) -> Self {
        Self {
            id: booking.id,
            owner_id: booking.owner_id,
            username: None,
            start_date: booking.start_date,
            end_date: booking.end_date,
            cost_per_day: booking.cost_per_day,
            post_code: booking.post_code.clone(),
            city: booking.city.clone(),
            street: booking.street.clone(),
            created: Some(booking.created),
            deleted: booking.deleted,
            version: booking.version,
        }
    }
}

derive_from_reference!(dao::booking::BookingEntity, Booking);

impl TryFrom<&Booking> for dao::booking::BookingEntity {
    type Error = ServiceError;
    fn try_from(booking: &Booking) -> Result<Self, Self::Error> {
        Ok(Self {
            id: booking.id,
            owner_id: booking.owner_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            cost_per_day: booking.cost_per_day,
            post_code: booking.post_code.clone(),
            city: booking.city.clone(),
            street: booking.street.clone(),
            created: booking.created.ok_or(ServiceError::InternalError)?,
            deleted: booking.deleted,
            version: booking.version,
        })
    }
}

/// Optional constraints for listing bookings.
///
/// Dates are kept in their textual `dd-MM-yyyy` form and only parsed when a
/// listing is requested, so a malformed date fails the listing as a whole.
/// Empty strings count as unset, as do cost bounds which are not positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub start_date_from: Option<Arc<str>>,
    pub start_date_to: Option<Arc<str>>,
    pub end_date_from: Option<Arc<str>>,
    pub end_date_to: Option<Arc<str>>,
    /// Upper bound for the daily cost.
    pub cost_up: Option<f64>,
    /// Lower bound for the daily cost.
    pub cost_down: Option<f64>,
    pub post_code: Option<Arc<str>>,
    pub city: Option<Arc<str>>,
    pub street: Option<Arc<str>>,
    pub username: Option<Arc<str>>,
}

/// Pagination is only engaged when both values are present and non zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: Option<i32>,
    /// 1-based.
    pub page_number: Option<i32>,
}
impl PageRequest {
    pub fn new(page_size: i32, page_number: i32) -> Self {
        Self {
            page_size: Some(page_size),
            page_number: Some(page_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingPage {
    pub bookings: Arc<[Booking]>,
    pub page_count: usize,
    pub has_next: bool,
}

#[automock(type Context=(); type Transaction=MockTransaction;)]
#[async_trait]
pub trait BookingService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Lists the bookings visible to the current actor which match `filter`,
    /// sliced according to `page`.
    async fn get_all(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<BookingPage, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Booking, ServiceError>;
    async fn create(
        &self,
        booking: &Booking,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Booking, ServiceError>;
    /// Replaces dates, cost, address and owner of the booking `id`.
    async fn update(
        &self,
        id: Uuid,
        booking: &Booking,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Booking, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
