use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShareCabError};

/// Lifecycle of a single ride, in the only order it may advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Searching,
    Assigned,
    Arriving,
    Waiting,
    Ongoing,
    Completed,
}

impl RideStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Searching => "searching",
            Self::Assigned => "assigned",
            Self::Arriving => "arriving",
            Self::Waiting => "waiting",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }

    /// The only status this one may move to, if any.
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Searching => Some(Self::Assigned),
            Self::Assigned => Some(Self::Arriving),
            Self::Arriving => Some(Self::Waiting),
            Self::Waiting => Some(Self::Ongoing),
            Self::Ongoing => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn offset(self, delta: f64) -> Self {
        Self {
            lat: self.lat + delta,
            lng: self.lng + delta,
        }
    }
}

/// Estimated time until the driver reaches the pickup point.
///
/// Rendered as `"7 mins"`, `"1 min"` or `"arriving"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Eta {
    Minutes(u32),
    Arriving,
}

impl Eta {
    pub const fn minutes(minutes: u32) -> Self {
        if minutes == 0 {
            Self::Arriving
        } else {
            Self::Minutes(minutes)
        }
    }

    /// One minute less; `Arriving` once nothing is left.
    pub const fn count_down(self) -> Self {
        match self {
            Self::Minutes(n) if n > 1 => Self::Minutes(n - 1),
            _ => Self::Arriving,
        }
    }

    pub const fn remaining_minutes(self) -> u32 {
        match self {
            Self::Minutes(n) => n,
            Self::Arriving => 0,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(1) => f.write_str("1 min"),
            Self::Minutes(n) => write!(f, "{n} mins"),
            Self::Arriving => f.write_str("arriving"),
        }
    }
}

impl FromStr for Eta {
    type Err = ShareCabError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("arriving") {
            return Ok(Self::Arriving);
        }

        let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
        digits
            .parse::<u32>()
            .map(Self::minutes)
            .map_err(|_| ShareCabError::Validation(format!("Invalid ETA label '{s}'")))
    }
}

impl From<Eta> for String {
    fn from(eta: Eta) -> Self {
        eta.to_string()
    }
}

impl TryFrom<String> for Eta {
    type Error = ShareCabError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideSession {
    pub progress: u8,
    pub estimated_time_remaining: Eta,
    pub status: RideStatus,
    pub driver_location: LatLng,
}

impl RideSession {
    /// A freshly assigned ride, as shown when the tracking page opens.
    pub fn new(progress: u8, eta_minutes: u32, driver_location: LatLng) -> Self {
        Self {
            progress: progress.min(100),
            estimated_time_remaining: Eta::minutes(eta_minutes),
            status: RideStatus::Assigned,
            driver_location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Driver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: MessageSender,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Connecting,
    Ongoing,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSession {
    pub status: CallStatus,
    pub duration_seconds: u32,
    pub dialog_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub total_rides: u32,
    pub vehicle: String,
    pub plate_number: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_is_monotonic() {
        let mut status = RideStatus::Searching;
        while let Some(next) = status.successor() {
            assert!(next > status);
            status = next;
        }
        assert_eq!(status, RideStatus::Completed);
    }

    #[test]
    fn test_eta_counts_down_to_arriving() {
        let eta = Eta::minutes(2);
        assert_eq!(eta.to_string(), "2 mins");

        let eta = eta.count_down();
        assert_eq!(eta.to_string(), "1 min");

        let eta = eta.count_down();
        assert_eq!(eta, Eta::Arriving);
        assert_eq!(eta.to_string(), "arriving");

        // Stays clamped
        assert_eq!(eta.count_down(), Eta::Arriving);
    }

    #[test]
    fn test_eta_zero_minutes_is_arriving() {
        assert_eq!(Eta::minutes(0), Eta::Arriving);
        assert_eq!(Eta::Arriving.remaining_minutes(), 0);
    }

    #[test]
    fn test_eta_parse_numeric_portion() {
        assert_eq!("7 mins".parse::<Eta>().unwrap(), Eta::Minutes(7));
        assert_eq!("12min".parse::<Eta>().unwrap(), Eta::Minutes(12));
        assert_eq!("Arriving".parse::<Eta>().unwrap(), Eta::Arriving);
        assert_eq!("0 mins".parse::<Eta>().unwrap(), Eta::Arriving);
        assert!("soon".parse::<Eta>().is_err());
    }

    #[test]
    fn test_ride_session_serializes_camel_case() {
        let session = RideSession::new(30, 7, LatLng::new(12.97, 77.59));
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["progress"], 30);
        assert_eq!(json["estimatedTimeRemaining"], "7 mins");
        assert_eq!(json["status"], "assigned");
        assert!(json["driverLocation"]["lat"].is_number());
    }

    #[test]
    fn test_ride_session_clamps_progress() {
        let session = RideSession::new(150, 3, LatLng::new(0.0, 0.0));
        assert_eq!(session.progress, 100);
    }

    #[test]
    fn test_booking_response_omits_missing_fields() {
        let response = BookingResponse {
            success: true,
            ride_id: Some("RIDE-1234ABCD".to_string()),
            error: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"success":true,"rideId":"RIDE-1234ABCD"}"#);
    }

    #[test]
    fn test_call_session_default() {
        let call = CallSession::default();
        assert_eq!(call.status, CallStatus::Connecting);
        assert_eq!(call.duration_seconds, 0);
        assert!(!call.dialog_open);
    }
}
