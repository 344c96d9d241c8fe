//! Server state: the mock API plus one ride page per tracked ride.

use std::collections::HashMap;
use std::sync::Arc;

use sharecab::api::MockApi;
use sharecab::call::CallSimulator;
use sharecab::chat::ChatSimulator;
use sharecab::config::Config;
use sharecab::error::{Result, ShareCabError};
use sharecab::notifier::{Notification, Notifier};
use sharecab::outcome::OutcomeProvider;
use sharecab::tracker::{RideHandle, RideTracker};
use sharecab::types::RideSession;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{info, warn};

/// Everything the tracking screen of one ride owns. Dropping it tears down
/// the tracker, chat and call timers together.
pub struct RidePage {
    pub tracker: RideHandle,
    pub chat: ChatSimulator,
    pub call: CallSimulator,
    notifications: broadcast::Receiver<Notification>,
}

impl RidePage {
    /// Notifications raised since the last drain, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        loop {
            match self.notifications.try_recv() {
                Ok(notification) => drained.push(notification),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(
                        "Ride {}: {} notification(s) dropped",
                        self.tracker.ride_id(),
                        skipped
                    );
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        drained
    }
}

pub type SharedPage = Arc<Mutex<RidePage>>;

#[derive(Clone)]
pub struct AppState {
    pub api: MockApi,
    config: Arc<Config>,
    outcomes: Arc<dyn OutcomeProvider>,
    rides: Arc<RwLock<HashMap<String, SharedPage>>>,
}

impl AppState {
    pub fn new(config: Config, outcomes: Arc<dyn OutcomeProvider>) -> Self {
        Self {
            api: MockApi::new(config.api.clone(), Arc::clone(&outcomes)),
            config: Arc::new(config),
            outcomes,
            rides: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn start_tracking(&self, ride_id: &str) -> Result<RideSession> {
        let mut rides = self.rides.write().await;
        if rides.contains_key(ride_id) {
            return Err(ShareCabError::AlreadyTracked(ride_id.to_string()));
        }

        let notifier = Notifier::new();
        let notifications = notifier.subscribe();
        let tracker = RideTracker::new(ride_id, &self.config.tracking, notifier)?.spawn();
        let session = tracker.snapshot();

        let page = RidePage {
            tracker,
            chat: ChatSimulator::new(self.config.chat.clone(), Arc::clone(&self.outcomes)),
            call: CallSimulator::new(self.config.call.clone()),
            notifications,
        };
        rides.insert(ride_id.to_string(), Arc::new(Mutex::new(page)));

        info!("Tracking {} ride(s)", rides.len());
        Ok(session)
    }

    pub async fn page(&self, ride_id: &str) -> Result<SharedPage> {
        self.rides
            .read()
            .await
            .get(ride_id)
            .cloned()
            .ok_or_else(|| ShareCabError::NotFound(format!("Ride {ride_id}")))
    }

    pub async fn stop_tracking(&self, ride_id: &str) -> Result<()> {
        let removed = self.rides.write().await.remove(ride_id);
        match removed {
            Some(_) => {
                info!("Stopped tracking ride {}", ride_id);
                Ok(())
            }
            None => Err(ShareCabError::NotFound(format!("Ride {ride_id}"))),
        }
    }

    pub async fn tracked_rides(&self) -> usize {
        self.rides.read().await.len()
    }
}
