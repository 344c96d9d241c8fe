//! Per-ride task driving the progress clock and status machine.
//!
//! A [`RideTracker`] owns its [`RideSession`] outright. Readers get
//! snapshots through a `watch` channel and send OTP or finish requests as
//! commands. Dropping the [`RideHandle`] aborts the task and its interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::TrackingConfig;
use crate::error::{Result, ShareCabError};
use crate::notifier::{Notification, Notifier};
use crate::otp::{self, ExpectedCode, LengthCheck, OtpOutcome, OtpVerifier};
use crate::progress::ProgressClock;
use crate::status::{StatusMachine, Transition};
use crate::types::{RideSession, RideStatus};

const COMMAND_BUFFER: usize = 8;

type Reply<T> = oneshot::Sender<Result<T>>;

enum RideCommand {
    VerifyOtp { code: String, reply: Reply<bool> },
    AssignDriver { reply: Reply<RideStatus> },
    Finish { reply: Reply<RideStatus> },
}

pub struct RideTracker {
    ride_id: String,
    session: RideSession,
    clock: ProgressClock,
    machine: StatusMachine,
    verifier: Arc<dyn OtpVerifier>,
    tick_interval: Duration,
    notifier: Notifier,
}

impl RideTracker {
    pub fn new(
        ride_id: impl Into<String>,
        config: &TrackingConfig,
        notifier: Notifier,
    ) -> Result<Self> {
        let verifier: Arc<dyn OtpVerifier> = match &config.expected_otp {
            Some(code) => Arc::new(ExpectedCode::new(code.clone())?),
            None => Arc::new(LengthCheck),
        };

        let session = RideSession::new(
            config.initial_progress,
            config.initial_eta_mins,
            config.initial_location,
        );

        Ok(Self {
            ride_id: ride_id.into(),
            machine: StatusMachine::new(session.status),
            session,
            clock: ProgressClock::new(config.progress_step, config.location_step),
            verifier,
            tick_interval: config.tick_interval,
            notifier,
        })
    }

    /// Start from an existing session instead of a fresh one.
    pub fn with_session(mut self, session: RideSession) -> Self {
        self.machine = StatusMachine::new(session.status);
        self.session = session;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn OtpVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn spawn(self) -> RideHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(self.session.clone());
        let ride_id = self.ride_id.clone();
        let notifier = self.notifier.clone();

        let task = tokio::spawn(self.run(command_rx, state_tx));

        RideHandle {
            ride_id,
            commands: command_tx,
            state: state_rx,
            notifier,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<RideCommand>,
        state: watch::Sender<RideSession>,
    ) {
        info!(
            "Starting tracker for ride {} at {}%",
            self.ride_id, self.session.progress
        );

        let mut interval = (!self.is_settled()).then(|| self.start_clock());

        loop {
            tokio::select! {
                () = next_tick(&mut interval) => {
                    self.on_tick();
                    state.send_replace(self.session.clone());

                    if self.is_settled() {
                        interval = None;
                        debug!("Progress clock stopped for ride {}", self.ride_id);
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    self.handle(command, &state);

                    if interval.is_none() && !self.is_settled() {
                        interval = Some(self.start_clock());
                        debug!("Progress clock started for ride {}", self.ride_id);
                    }
                }
            }
        }

        info!("Tracker for ride {} shutting down", self.ride_id);
    }

    /// Nothing for the clock to do: no driver has been assigned yet, or
    /// progress is full and no timer-driven transition is still owed.
    fn is_settled(&self) -> bool {
        self.machine.current() == RideStatus::Searching
            || (ProgressClock::is_complete(&self.session)
                && self.machine.pending(self.session.progress).is_none())
    }

    /// First tick fires one full period from now.
    fn start_clock(&self) -> Interval {
        let mut interval =
            time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }

    fn on_tick(&mut self) {
        if self.clock.advance(&mut self.session) {
            debug!(
                "Ride {} progress {}% (eta {}, {} ticks left)",
                self.ride_id,
                self.session.progress,
                self.session.estimated_time_remaining,
                self.clock.ticks_remaining(self.session.progress)
            );
        }

        if let Some(transition) = self.machine.on_progress(self.session.progress) {
            self.apply(transition);
        }
    }

    /// The new state is published before the reply goes out.
    fn handle(&mut self, command: RideCommand, state: &watch::Sender<RideSession>) {
        match command {
            RideCommand::VerifyOtp { code, reply } => {
                let result = self.verify_otp(&code);
                state.send_replace(self.session.clone());
                let _ = reply.send(result);
            }
            RideCommand::AssignDriver { reply } => {
                let result = self.machine.assign_driver().map(|t| self.apply(t));
                state.send_replace(self.session.clone());
                let _ = reply.send(result);
            }
            RideCommand::Finish { reply } => {
                let result = self.machine.complete().map(|t| self.apply(t));
                state.send_replace(self.session.clone());
                let _ = reply.send(result);
            }
        }
    }

    fn verify_otp(&mut self, code: &str) -> Result<bool> {
        match otp::verify_otp(&mut self.machine, self.verifier.as_ref(), code) {
            Ok(OtpOutcome::Accepted(transition)) => {
                self.apply(transition);
                Ok(true)
            }
            Ok(OtpOutcome::Rejected) => {
                self.notifier.notify(Notification::otp_rejected());
                Ok(false)
            }
            Err(e) => {
                warn!("Ride {}: {}", self.ride_id, e);
                Err(e)
            }
        }
    }

    fn apply(&mut self, transition: Transition) -> RideStatus {
        info!(
            "Ride {} status {} -> {}",
            self.ride_id, transition.from, transition.to
        );
        self.session.status = transition.to;

        if let Some(notification) = Notification::for_transition(&transition) {
            self.notifier.notify(notification);
        }
        transition.to
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Owner handle for a running tracker.
pub struct RideHandle {
    ride_id: String,
    commands: mpsc::Sender<RideCommand>,
    state: watch::Receiver<RideSession>,
    notifier: Notifier,
    task: JoinHandle<()>,
}

impl RideHandle {
    pub fn ride_id(&self) -> &str {
        &self.ride_id
    }

    pub fn snapshot(&self) -> RideSession {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<RideSession> {
        self.state.clone()
    }

    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// `Ok(false)` when the code was rejected.
    pub async fn verify_otp(&self, code: &str) -> Result<bool> {
        let code = code.to_string();
        self.request(|reply| RideCommand::VerifyOtp { code, reply }).await
    }

    pub async fn assign_driver(&self) -> Result<RideStatus> {
        self.request(|reply| RideCommand::AssignDriver { reply }).await
    }

    /// Leave the ride for the feedback screen.
    pub async fn finish_ride(&self) -> Result<RideStatus> {
        self.request(|reply| RideCommand::Finish { reply }).await
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> RideCommand) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| ShareCabError::SessionClosed)?;
        reply_rx.await.map_err(|_| ShareCabError::SessionClosed)?
    }
}

impl Drop for RideHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
