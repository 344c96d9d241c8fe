//! ShareCab ride simulator.
//!
//! A ride's progress clock, status machine and OTP gate run inside a
//! [`tracker::RideTracker`] task; the chat and call simulators run their
//! own timers. [`api::MockApi`] stands in for the booking backend.

pub mod api;
pub mod call;
pub mod chat;
pub mod config;
pub mod error;
pub mod notifier;
pub mod otp;
pub mod outcome;
pub mod progress;
pub mod status;
pub mod tracker;
pub mod types;
pub mod validation;

pub use error::{Result, ShareCabError};
