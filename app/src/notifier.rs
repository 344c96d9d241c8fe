use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::status::Transition;
use crate::types::RideStatus;

const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    pub timestamp: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: &str, description: &str) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The message announcing entry into `transition.to`.
    pub fn for_transition(transition: &Transition) -> Option<Self> {
        let (level, title, description) = match transition.to {
            RideStatus::Searching => return None,
            RideStatus::Assigned => (
                NotificationLevel::Success,
                "Driver assigned",
                "A driver has accepted your ride",
            ),
            RideStatus::Arriving => (
                NotificationLevel::Info,
                "Driver is arriving",
                "Your driver is almost at the pickup point",
            ),
            RideStatus::Waiting => (
                NotificationLevel::Success,
                "Driver has arrived",
                "Share your OTP with the driver to start the ride",
            ),
            RideStatus::Ongoing => (
                NotificationLevel::Success,
                "OTP verified",
                "Your ride has started",
            ),
            RideStatus::Completed => (
                NotificationLevel::Success,
                "Ride completed",
                "Thanks for riding with ShareCab",
            ),
        };

        Some(Self::new(level, title, description))
    }

    pub fn otp_rejected() -> Self {
        Self::new(
            NotificationLevel::Error,
            "Invalid OTP",
            "Please enter the 4-digit code shown to your driver",
        )
    }
}

/// Fans notifications out to every subscriber and logs them.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                warn!("{}: {}", notification.title, notification.description);
            }
            NotificationLevel::Success | NotificationLevel::Info => {
                info!("{}: {}", notification.title, notification.description);
            }
        }

        if self.tx.send(notification).is_err() {
            debug!("Notification dropped, no subscribers");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
