use std::fmt;

use crate::types::RideStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareCabError {
    Config(String),
    Validation(String),
    NotFound(String),
    InvalidTransition { from: RideStatus, to: RideStatus },
    AlreadyTracked(String),
    SessionClosed,
}

impl fmt::Display for ShareCabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid ride status transition: {from} -> {to}")
            }
            Self::AlreadyTracked(ride_id) => write!(f, "Ride {ride_id} is already being tracked"),
            Self::SessionClosed => write!(f, "Ride session has been closed"),
        }
    }
}

impl std::error::Error for ShareCabError {}

pub type Result<T> = std::result::Result<T, ShareCabError>;
