use std::sync::Arc;

use booking_utils::parse_optional_filter_date;
use service::{
    booking::{Booking, BookingFilter},
    ServiceError,
};
use time::Date;

/// A [`BookingFilter`] with all dates parsed and all unset values removed.
///
/// Every constraint is checked independently and a booking matches if it
/// passes all of them, so filtering only ever drops elements and never
/// changes their order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPredicate {
    pub start_date_from: Option<Date>,
    pub start_date_to: Option<Date>,
    pub end_date_from: Option<Date>,
    pub end_date_to: Option<Date>,
    pub cost_up: Option<f64>,
    pub cost_down: Option<f64>,
    pub post_code: Option<Arc<str>>,
    pub city: Option<Arc<str>>,
    pub street: Option<Arc<str>>,
    pub username: Option<Arc<str>>,
}

fn non_empty(value: &Option<Arc<str>>) -> Option<Arc<str>> {
    value.as_ref().filter(|value| !value.is_empty()).cloned()
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|value| *value > 0.0)
}

impl TryFrom<&BookingFilter> for BookingPredicate {
    type Error = ServiceError;

    fn try_from(filter: &BookingFilter) -> Result<Self, Self::Error> {
        Ok(Self {
            start_date_from: parse_optional_filter_date(filter.start_date_from.as_deref())?,
            start_date_to: parse_optional_filter_date(filter.start_date_to.as_deref())?,
            end_date_from: parse_optional_filter_date(filter.end_date_from.as_deref())?,
            end_date_to: parse_optional_filter_date(filter.end_date_to.as_deref())?,
            cost_up: positive(filter.cost_up),
            cost_down: positive(filter.cost_down),
            post_code: non_empty(&filter.post_code),
            city: non_empty(&filter.city),
            street: non_empty(&filter.street),
            username: non_empty(&filter.username),
        })
    }
}

impl BookingPredicate {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.start_date_from
            .is_none_or(|from| from <= booking.start_date)
            && self.start_date_to.is_none_or(|to| booking.start_date <= to)
            && self.end_date_from.is_none_or(|from| from <= booking.end_date)
            && self.end_date_to.is_none_or(|to| booking.end_date <= to)
            && self.cost_up.is_none_or(|max| booking.cost_per_day <= max)
            && self.cost_down.is_none_or(|min| booking.cost_per_day >= min)
            && self
                .post_code
                .as_ref()
                .is_none_or(|post_code| *post_code == booking.post_code)
            && self.city.as_ref().is_none_or(|city| *city == booking.city)
            && self
                .street
                .as_ref()
                .is_none_or(|street| *street == booking.street)
            && self
                .username
                .as_ref()
                .is_none_or(|username| booking.username.as_ref() == Some(username))
    }

    pub fn apply(&self, bookings: impl IntoIterator<Item = Booking>) -> Vec<Booking> {
        bookings
            .into_iter()
            .filter(|booking| self.matches(booking))
            .collect()
    }
}
