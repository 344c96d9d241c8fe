use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, ShareCabError};
use crate::otp::ExpectedCode;
use crate::types::LatLng;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    pub tick_interval: Duration,
    pub progress_step: u8,
    pub initial_progress: u8,
    pub initial_eta_mins: u32,
    pub initial_location: LatLng,
    pub location_step: f64,
    pub expected_otp: Option<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            progress_step: 5,
            initial_progress: 30,
            initial_eta_mins: 7,
            initial_location: LatLng::new(12.9716, 77.5946),
            location_step: 0.0005,
            expected_otp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub reply_delay: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallConfig {
    pub connect_delay: Duration,
    pub reset_delay: Duration,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            connect_delay: Duration::from_millis(2000),
            reset_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub booking_delay: Duration,
    pub driver_delay: Duration,
    pub report_delay: Duration,
    pub payment_delay: Duration,
    pub booking_success_rate: f64,
    pub payment_success_rate: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            booking_delay: Duration::from_millis(1500),
            driver_delay: Duration::from_millis(500),
            report_delay: Duration::from_millis(1000),
            payment_delay: Duration::from_millis(2000),
            booking_success_rate: 0.9,
            payment_success_rate: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub chat: ChatConfig,
    pub call: CallConfig,
    pub api: ApiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let tick_interval_secs = parse_env(
            "TICK_INTERVAL_SECS",
            defaults.tracking.tick_interval.as_secs(),
        )?;
        if tick_interval_secs == 0 {
            return Err(ShareCabError::Config(
                "TICK_INTERVAL_SECS must be greater than 0".to_string(),
            ));
        }

        let progress_step = parse_env("PROGRESS_STEP", defaults.tracking.progress_step)?;
        if !(1..=100).contains(&progress_step) {
            return Err(ShareCabError::Config(
                "PROGRESS_STEP must be between 1 and 100".to_string(),
            ));
        }

        let initial_progress = parse_env("INITIAL_PROGRESS", defaults.tracking.initial_progress)?;
        if initial_progress > 100 {
            return Err(ShareCabError::Config(
                "INITIAL_PROGRESS must be at most 100".to_string(),
            ));
        }

        let expected_otp = match dotenvy::var("RIDE_OTP").ok().filter(|s| !s.is_empty()) {
            Some(code) => {
                ExpectedCode::new(code.as_str())
                    .map_err(|_| ShareCabError::Config("Invalid RIDE_OTP".to_string()))?;
                Some(code)
            }
            None => None,
        };

        let tracking = TrackingConfig {
            tick_interval: Duration::from_secs(tick_interval_secs),
            progress_step,
            initial_progress,
            initial_eta_mins: parse_env("INITIAL_ETA_MINS", defaults.tracking.initial_eta_mins)?,
            initial_location: defaults.tracking.initial_location,
            location_step: parse_env("LOCATION_STEP", defaults.tracking.location_step)?,
            expected_otp,
        };

        let chat = ChatConfig {
            reply_delay: parse_env_millis("CHAT_REPLY_DELAY_MS", defaults.chat.reply_delay)?,
        };

        let call = CallConfig {
            connect_delay: parse_env_millis("CALL_CONNECT_DELAY_MS", defaults.call.connect_delay)?,
            reset_delay: parse_env_millis("CALL_RESET_DELAY_MS", defaults.call.reset_delay)?,
        };

        let api = ApiConfig {
            booking_delay: parse_env_millis("BOOKING_DELAY_MS", defaults.api.booking_delay)?,
            driver_delay: parse_env_millis("DRIVER_DELAY_MS", defaults.api.driver_delay)?,
            report_delay: parse_env_millis("REPORT_DELAY_MS", defaults.api.report_delay)?,
            payment_delay: parse_env_millis("PAYMENT_DELAY_MS", defaults.api.payment_delay)?,
            booking_success_rate: parse_env_rate(
                "BOOKING_SUCCESS_RATE",
                defaults.api.booking_success_rate,
            )?,
            payment_success_rate: parse_env_rate(
                "PAYMENT_SUCCESS_RATE",
                defaults.api.payment_success_rate,
            )?,
        };

        Ok(Self {
            tracking,
            chat,
            call,
            api,
        })
    }
}

fn parse_env<T: FromStr + ToString>(key: &str, default: T) -> Result<T> {
    dotenvy::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|_| ShareCabError::Config(format!("Invalid {key}")))
}

fn parse_env_millis(key: &str, default: Duration) -> Result<Duration> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_env(key, default_ms).map(Duration::from_millis)
}

fn parse_env_rate(key: &str, default: f64) -> Result<f64> {
    let rate = parse_env(key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ShareCabError::Config(format!("{key} must be between 0 and 1")))
    }
}
