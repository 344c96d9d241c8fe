//! Mock ride-booking API.
//!
//! Every call waits for a configured delay, then answers with fixed or
//! randomized data. Business failures are reported in-band through
//! `success: false` and a generic error string.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::outcome::OutcomeProvider;
use crate::types::{
    BookingRequest, BookingResponse, Driver, PaymentRequest, PaymentResponse, ReportResponse,
};

pub const CARD_NUMBER_DIGITS: usize = 16;

pub const BOOKING_FAILED: &str = "Failed to book ride. Please try again.";
pub const INVALID_CARD: &str = "Invalid card number";
pub const PAYMENT_DECLINED: &str = "Payment failed. Please try again.";

#[derive(Clone)]
pub struct MockApi {
    config: ApiConfig,
    outcomes: Arc<dyn OutcomeProvider>,
}

impl MockApi {
    pub fn new(config: ApiConfig, outcomes: Arc<dyn OutcomeProvider>) -> Self {
        Self { config, outcomes }
    }

    pub async fn book_ride(&self, request: &BookingRequest) -> BookingResponse {
        simulate_latency(self.config.booking_delay).await;

        if self.outcomes.succeeds(self.config.booking_success_rate) {
            let ride_id = format!("RIDE-{}", short_id(8));
            info!(
                "Booked ride {} from {} to {} at {}",
                ride_id, request.pickup_location, request.dropoff_location, request.pickup_time
            );
            BookingResponse {
                success: true,
                ride_id: Some(ride_id),
                error: None,
            }
        } else {
            warn!(
                "Booking failed from {} to {}",
                request.pickup_location, request.dropoff_location
            );
            BookingResponse {
                success: false,
                ride_id: None,
                error: Some(BOOKING_FAILED.to_string()),
            }
        }
    }

    pub async fn get_driver(&self, id: &str) -> Option<Driver> {
        simulate_latency(self.config.driver_delay).await;

        let driver = driver_roster().into_iter().find(|d| d.id == id);
        if driver.is_none() {
            debug!("No driver with id {}", id);
        }
        driver
    }

    /// Always succeeds.
    pub async fn report_driver(&self, driver_id: &str, reason: &str) -> ReportResponse {
        simulate_latency(self.config.report_delay).await;

        warn!("Driver {} reported: {}", driver_id, reason);
        ReportResponse { success: true }
    }

    pub async fn process_payment(&self, request: &PaymentRequest) -> PaymentResponse {
        simulate_latency(self.config.payment_delay).await;

        let digits = card_digits(&request.card_number);
        if !is_valid_card_number(&request.card_number) {
            warn!("Rejected card with {} digits", digits.len());
            return PaymentResponse {
                success: false,
                transaction_id: None,
                error: Some(INVALID_CARD.to_string()),
            };
        }

        if self.outcomes.succeeds(self.config.payment_success_rate) {
            let transaction_id = format!("TXN-{}", short_id(10));
            info!(
                "Payment {} accepted for card ending {}",
                transaction_id,
                &digits[digits.len() - 4..]
            );
            PaymentResponse {
                success: true,
                transaction_id: Some(transaction_id),
                error: None,
            }
        } else {
            warn!("Payment declined for card ending {}", &digits[digits.len() - 4..]);
            PaymentResponse {
                success: false,
                transaction_id: None,
                error: Some(PAYMENT_DECLINED.to_string()),
            }
        }
    }
}

/// The fixed set of drivers the mock API knows about.
pub fn driver_roster() -> Vec<Driver> {
    vec![
        Driver {
            id: "1".to_string(),
            name: "Rajesh Kumar".to_string(),
            rating: 4.8,
            total_rides: 1243,
            vehicle: "Maruti Suzuki Dzire (White)".to_string(),
            plate_number: "KA 01 AB 1234".to_string(),
            phone: "+91 98765 43210".to_string(),
        },
        Driver {
            id: "2".to_string(),
            name: "Priya Sharma".to_string(),
            rating: 4.9,
            total_rides: 876,
            vehicle: "Hyundai Xcent (Silver)".to_string(),
            plate_number: "KA 05 CD 5678".to_string(),
            phone: "+91 91234 56780".to_string(),
        },
        Driver {
            id: "3".to_string(),
            name: "Arjun Reddy".to_string(),
            rating: 4.6,
            total_rides: 532,
            vehicle: "Toyota Etios (Grey)".to_string(),
            plate_number: "KA 03 EF 9012".to_string(),
            phone: "+91 99887 76655".to_string(),
        },
    ]
}

/// Card number digits, ignoring the separators of the formatted input.
pub fn card_digits(card_number: &str) -> String {
    card_number.chars().filter(char::is_ascii_digit).collect()
}

/// Exactly 16 digits once spaces are removed. Any other character rejects.
fn is_valid_card_number(card_number: &str) -> bool {
    let mut count = 0;
    for c in card_number.chars().filter(|c| *c != ' ') {
        if !c.is_ascii_digit() {
            return false;
        }
        count += 1;
    }
    count == CARD_NUMBER_DIGITS
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn short_id(len: usize) -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    id[..len.min(id.len())].to_string()
}
