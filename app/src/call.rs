use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::CallConfig;
use crate::types::{CallSession, CallStatus};

const COUNTER_RESOLUTION: Duration = Duration::from_secs(1);

/// Mock voice call with the driver.
///
/// `connecting -> ongoing -> ended`, then back to `connecting` with the
/// dialog closed once the reset delay has passed.
pub struct CallSimulator {
    state: Arc<watch::Sender<CallSession>>,
    timers: JoinSet<()>,
    config: CallConfig,
}

impl CallSimulator {
    pub fn new(config: CallConfig) -> Self {
        let (state, _) = watch::channel(CallSession::default());
        Self {
            state: Arc::new(state),
            timers: JoinSet::new(),
            config,
        }
    }

    /// Open the call dialog. No-op when it is already open.
    pub fn open(&mut self) -> bool {
        if self.state.borrow().dialog_open {
            return false;
        }

        self.cancel_timers();
        self.state.send_replace(CallSession {
            status: CallStatus::Connecting,
            duration_seconds: 0,
            dialog_open: true,
        });
        info!("Calling driver...");

        let state = Arc::clone(&self.state);
        let connect_delay = self.config.connect_delay;

        self.timers.spawn(async move {
            time::sleep(connect_delay).await;
            state.send_modify(|call| call.status = CallStatus::Ongoing);
            debug!("Call connected");

            let mut counter =
                time::interval_at(Instant::now() + COUNTER_RESOLUTION, COUNTER_RESOLUTION);
            counter.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                counter.tick().await;
                let counted = state.send_if_modified(|call| {
                    if call.status == CallStatus::Ongoing {
                        call.duration_seconds += 1;
                        true
                    } else {
                        false
                    }
                });
                if !counted {
                    break;
                }
            }
        });

        true
    }

    /// Hang up. The duration is frozen until the dialog resets.
    /// No-op when no call is open or it has already ended.
    pub fn end(&mut self) -> bool {
        let current = *self.state.borrow();
        if !current.dialog_open || current.status == CallStatus::Ended {
            return false;
        }

        self.cancel_timers();
        self.state.send_modify(|call| call.status = CallStatus::Ended);
        info!("Call ended after {}s", current.duration_seconds);

        let state = Arc::clone(&self.state);
        let reset_delay = self.config.reset_delay;

        self.timers.spawn(async move {
            time::sleep(reset_delay).await;
            state.send_replace(CallSession::default());
            debug!("Call dialog closed");
        });

        true
    }

    /// Closing the dialog hangs up.
    pub fn close(&mut self) -> bool {
        self.end()
    }

    pub fn snapshot(&self) -> CallSession {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CallSession> {
        self.state.subscribe()
    }

    fn cancel_timers(&mut self) {
        // Dropping the set aborts every task still in it
        self.timers = JoinSet::new();
    }
}
