//! Form checks run before a booking or payment is submitted.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use crate::api::card_digits;
use crate::error::{Result, ShareCabError};
use crate::types::{BookingRequest, PaymentRequest};

static PICKUP_TIME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").ok());
static EXPIRY_DATE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").ok());
static CVV: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{3,4}$").ok());

pub fn validate_booking(request: &BookingRequest) -> Result<()> {
    let pickup = request.pickup_location.trim();
    let dropoff = request.dropoff_location.trim();

    if pickup.is_empty() {
        return Err(invalid("Pickup location is required"));
    }
    if dropoff.is_empty() {
        return Err(invalid("Dropoff location is required"));
    }
    if pickup.eq_ignore_ascii_case(dropoff) {
        return Err(invalid("Pickup and dropoff locations must differ"));
    }
    if !is_pickup_time(request.pickup_time.trim()) {
        return Err(invalid("Pickup time must be HH:MM or a full date and time"));
    }
    Ok(())
}

pub fn validate_payment(request: &PaymentRequest) -> Result<()> {
    if request.name.trim().is_empty() {
        return Err(invalid("Cardholder name is required"));
    }
    if !matches(&EXPIRY_DATE, request.expiry_date.trim()) {
        return Err(invalid("Expiry date must be MM/YY"));
    }
    if !matches(&CVV, request.cvv.trim()) {
        return Err(invalid("CVV must be 3 or 4 digits"));
    }
    Ok(())
}

/// Group card digits in fours, e.g. `4111 1111 1111 1111`.
pub fn format_card_number(input: &str) -> String {
    card_digits(input)
        .chars()
        .collect::<Vec<_>>()
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_pickup_time(value: &str) -> bool {
    matches(&PICKUP_TIME, value)
        || DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
}

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

fn invalid(msg: &str) -> ShareCabError {
    ShareCabError::Validation(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(pickup: &str, dropoff: &str, time: &str) -> BookingRequest {
        BookingRequest {
            pickup_location: pickup.to_string(),
            dropoff_location: dropoff.to_string(),
            pickup_time: time.to_string(),
        }
    }

    fn payment(expiry: &str, cvv: &str, name: &str) -> PaymentRequest {
        PaymentRequest {
            card_number: "4111 1111 1111 1111".to_string(),
            expiry_date: expiry.to_string(),
            cvv: cvv.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_valid_booking() {
        assert!(validate_booking(&booking("MG Road", "Airport", "08:30")).is_ok());
        assert!(validate_booking(&booking("MG Road", "Airport", "2025-10-29T08:30")).is_ok());
        assert!(validate_booking(&booking("MG Road", "Airport", "2025-10-29T08:30:00+05:30")).is_ok());
    }

    #[test]
    fn test_booking_requires_locations() {
        let err = validate_booking(&booking("  ", "Airport", "08:30")).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Pickup location is required");

        assert!(validate_booking(&booking("MG Road", "", "08:30")).is_err());
    }

    #[test]
    fn test_booking_rejects_same_locations() {
        assert!(validate_booking(&booking("Airport", "airport", "08:30")).is_err());
    }

    #[test]
    fn test_booking_rejects_bad_time() {
        assert!(validate_booking(&booking("MG Road", "Airport", "24:00")).is_err());
        assert!(validate_booking(&booking("MG Road", "Airport", "8:30")).is_err());
        assert!(validate_booking(&booking("MG Road", "Airport", "")).is_err());
    }

    #[test]
    fn test_valid_payment() {
        assert!(validate_payment(&payment("12/27", "123", "A Rider")).is_ok());
        assert!(validate_payment(&payment("01/30", "1234", "A Rider")).is_ok());
    }

    #[test]
    fn test_payment_rejects_bad_fields() {
        assert!(validate_payment(&payment("13/27", "123", "A Rider")).is_err());
        assert!(validate_payment(&payment("1227", "123", "A Rider")).is_err());
        assert!(validate_payment(&payment("12/27", "12", "A Rider")).is_err());
        assert!(validate_payment(&payment("12/27", "12a", "A Rider")).is_err());
        assert!(validate_payment(&payment("12/27", "123", " ")).is_err());
    }

    #[test]
    fn test_payment_ignores_card_length() {
        let mut request = payment("12/27", "123", "A Rider");
        request.card_number = "4111".to_string();
        assert!(validate_payment(&request).is_ok());
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("4111 11"), "4111 11");
        assert_eq!(format_card_number(""), "");
    }
}
