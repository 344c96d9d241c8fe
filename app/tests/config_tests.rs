//! Tests for `Config::from_env`
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::time::Duration;

use serial_test::serial;
use sharecab::config::Config;
use sharecab::error::ShareCabError;
use temp_env::with_vars;

const ALL_VARS: [&str; 15] = [
    "TICK_INTERVAL_SECS",
    "PROGRESS_STEP",
    "INITIAL_PROGRESS",
    "INITIAL_ETA_MINS",
    "LOCATION_STEP",
    "RIDE_OTP",
    "CHAT_REPLY_DELAY_MS",
    "CALL_CONNECT_DELAY_MS",
    "CALL_RESET_DELAY_MS",
    "BOOKING_DELAY_MS",
    "DRIVER_DELAY_MS",
    "REPORT_DELAY_MS",
    "PAYMENT_DELAY_MS",
    "BOOKING_SUCCESS_RATE",
    "PAYMENT_SUCCESS_RATE",
];

/// Every variable unset, then the given overrides.
fn env(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    ALL_VARS
        .iter()
        .map(|key| {
            let value = overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
            (*key, value)
        })
        .collect()
}

#[test]
#[serial]
fn test_defaults() {
    with_vars(env(&[]), || {
        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tracking.tick_interval, Duration::from_secs(5));
        assert_eq!(config.tracking.progress_step, 5);
        assert_eq!(config.tracking.initial_progress, 30);
        assert_eq!(config.chat.reply_delay, Duration::from_millis(2000));
        assert_eq!(config.api.booking_success_rate, 0.9);
        assert_eq!(config.api.payment_success_rate, 0.85);
        assert!(config.tracking.expected_otp.is_none());
    });
}

#[test]
#[serial]
fn test_custom_values() {
    with_vars(
        env(&[
            ("TICK_INTERVAL_SECS", "1"),
            ("PROGRESS_STEP", "10"),
            ("INITIAL_PROGRESS", "0"),
            ("INITIAL_ETA_MINS", "12"),
            ("RIDE_OTP", "4821"),
            ("CALL_RESET_DELAY_MS", "250"),
            ("PAYMENT_SUCCESS_RATE", "1.0"),
        ]),
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.tracking.tick_interval, Duration::from_secs(1));
            assert_eq!(config.tracking.progress_step, 10);
            assert_eq!(config.tracking.initial_progress, 0);
            assert_eq!(config.tracking.initial_eta_mins, 12);
            assert_eq!(config.tracking.expected_otp.as_deref(), Some("4821"));
            assert_eq!(config.call.reset_delay, Duration::from_millis(250));
            assert_eq!(config.api.payment_success_rate, 1.0);
        },
    );
}

#[test]
#[serial]
fn test_empty_otp_is_unset() {
    with_vars(env(&[("RIDE_OTP", "")]), || {
        let config = Config::from_env().unwrap();
        assert!(config.tracking.expected_otp.is_none());
    });
}

#[test]
#[serial]
fn test_unparsable_value_names_variable() {
    with_vars(env(&[("PROGRESS_STEP", "fast")]), || {
        let err = Config::from_env().unwrap_err();
        assert_eq!(
            err,
            ShareCabError::Config("Invalid PROGRESS_STEP".to_string())
        );
    });
}

#[test]
#[serial]
fn test_progress_step_bounds() {
    for step in ["0", "101"] {
        with_vars(env(&[("PROGRESS_STEP", step)]), || {
            assert!(Config::from_env().is_err(), "step {step}");
        });
    }
}

#[test]
#[serial]
fn test_initial_progress_bound() {
    with_vars(env(&[("INITIAL_PROGRESS", "120")]), || {
        assert!(Config::from_env().is_err());
    });
}

#[test]
#[serial]
fn test_zero_tick_interval_rejected() {
    with_vars(env(&[("TICK_INTERVAL_SECS", "0")]), || {
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("TICK_INTERVAL_SECS"));
    });
}

#[test]
#[serial]
fn test_success_rate_out_of_range() {
    with_vars(env(&[("BOOKING_SUCCESS_RATE", "1.5")]), || {
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("BOOKING_SUCCESS_RATE"));
    });
}

#[test]
#[serial]
fn test_malformed_otp_rejected_upfront() {
    for otp in ["123", "12ab", "12345", " 123"] {
        with_vars(env(&[("RIDE_OTP", otp)]), || {
            let err = Config::from_env().unwrap_err();
            assert_eq!(
                err,
                ShareCabError::Config("Invalid RIDE_OTP".to_string()),
                "otp {otp:?}"
            );
        });
    }
}
