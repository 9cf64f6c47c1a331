use thiserror::Error;
use time::macros::format_description;
use time::Date;

#[derive(Debug, Error)]
pub enum BookingDateUtilsError {
    #[error("Invalid date '{0}', expected dd-MM-yyyy: {1}")]
    ParseError(String, #[source] time::error::Parse),
}

/// Parses a date in the `dd-MM-yyyy` form used by booking filters.
///
/// Day and month must be zero padded. Dates which do not exist in the
/// calendar (like `31-02-2024`) are rejected.
pub fn parse_filter_date(value: &str) -> Result<Date, BookingDateUtilsError> {
    Date::parse(value, format_description!("[day]-[month]-[year]"))
        .map_err(|err| BookingDateUtilsError::ParseError(value.to_string(), err))
}

/// Like [`parse_filter_date`] but treats `None` and the empty string as
/// "no value".
pub fn parse_optional_filter_date(
    value: Option<&str>,
) -> Result<Option<Date>, BookingDateUtilsError> {
    match value {
        None | Some("") => Ok(None),
        Some(value) => parse_filter_date(value).map(Some),
    }
}
