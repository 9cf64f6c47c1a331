use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, PrimitiveDateTime};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

time::serde::format_description!(booking_date, Date, "[day]-[month]-[year]");

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct BookingTO {
    #[serde(default)]
    pub id: Uuid,
    /// Defaults to the current user on create and to the current owner on update.
    #[serde(default)]
    pub owner_id: Uuid,
    /// Owner name, only filled in responses.
    #[serde(default)]
    pub username: Option<Arc<str>>,
    #[serde(with = "booking_date")]
    #[schema(value_type = String, example = "01-03-2024")]
    pub start_date: Date,
    #[serde(with = "booking_date")]
    #[schema(value_type = String, example = "05-03-2024")]
    pub end_date: Date,
    pub cost_per_day: f64,
    pub post_code: Arc<str>,
    pub city: Arc<str>,
    pub street: Arc<str>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::booking::Booking> for BookingTO {
    fn from(booking: &service::booking::Booking) -> Self {
        Self {
            id: booking.id,
            owner_id: booking.owner_id,
            username: booking.username.clone(),
            start_date: booking.start_date,
            end_date: booking.end_date,
            cost_per_day: booking.cost_per_day,
            post_code: booking.post_code.clone(),
            city: booking.city.clone(),
            street: booking.street.clone(),
            created: booking.created,
            deleted: booking.deleted,
            version: booking.version,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<&BookingTO> for service::booking::Booking {
    fn from(booking: &BookingTO) -> Self {
        Self {
            id: booking.id,
            owner_id: booking.owner_id,
            username: booking.username.clone(),
            start_date: booking.start_date,
            end_date: booking.end_date,
            cost_per_day: booking.cost_per_day,
            post_code: booking.post_code.clone(),
            city: booking.city.clone(),
            street: booking.street.clone(),
            created: booking.created,
            deleted: booking.deleted,
            version: booking.version,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct BookingPageTO {
    pub bookings: Arc<[BookingTO]>,
    /// Zero if no pagination was requested or the page size exceeds the result.
    pub page_count: usize,
    pub has_next: bool,
}
#[cfg(feature = "service-impl")]
impl From<&service::booking::BookingPage> for BookingPageTO {
    fn from(page: &service::booking::BookingPage) -> Self {
        Self {
            bookings: page.bookings.iter().map(BookingTO::from).collect(),
            page_count: page.page_count,
            has_next: page.has_next,
        }
    }
}

/// Reads an optional query value, treating a blank one like a missing one.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<Arc<str>>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Query parameters of the booking listing. Dates use the `dd-MM-yyyy` form.
/// Blank values count as unset.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "kebab-case")]
pub struct BookingQueryTO {
    #[param(example = "01-03-2024")]
    pub start_date_from: Option<Arc<str>>,
    #[param(example = "31-03-2024")]
    pub start_date_to: Option<Arc<str>>,
    pub end_date_from: Option<Arc<str>>,
    pub end_date_to: Option<Arc<str>>,
    /// Maximum cost per day. Values of zero or less are ignored.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cost_up: Option<f64>,
    /// Minimum cost per day. Values of zero or less are ignored.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cost_down: Option<f64>,
    pub post_code: Option<Arc<str>>,
    pub city: Option<Arc<str>>,
    pub street: Option<Arc<str>>,
    pub username: Option<Arc<str>>,
    /// Negative sizes yield an empty page.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[param(example = 10)]
    pub page_size: Option<i32>,
    /// 1-based.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[param(example = 1)]
    pub page_number: Option<i32>,
}
#[cfg(feature = "service-impl")]
impl From<&BookingQueryTO> for service::booking::BookingFilter {
    fn from(query: &BookingQueryTO) -> Self {
        Self {
            start_date_from: query.start_date_from.clone(),
            start_date_to: query.start_date_to.clone(),
            end_date_from: query.end_date_from.clone(),
            end_date_to: query.end_date_to.clone(),
            cost_up: query.cost_up,
            cost_down: query.cost_down,
            post_code: query.post_code.clone(),
            city: query.city.clone(),
            street: query.street.clone(),
            username: query.username.clone(),
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<&BookingQueryTO> for service::booking::PageRequest {
    fn from(query: &BookingQueryTO) -> Self {
        Self {
            page_size: query.page_size,
            page_number: query.page_number,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct AccountTO {
    #[serde(default)]
    pub id: Uuid,
    pub name: Arc<str>,
    /// `USER` for restricted accounts, anything else is elevated.
    pub role: Arc<str>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::account::Account> for AccountTO {
    fn from(account: &service::account::Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            role: account.role.clone(),
            created: account.created,
            deleted: account.deleted,
            version: account.version,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<&AccountTO> for service::account::Account {
    fn from(account: &AccountTO) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            role: account.role.clone(),
            created: account.created,
            deleted: account.deleted,
            version: account.version,
        }
    }
}
