//! Ride status state machine.
//!
//! Timer-driven transitions are derived from progress; the rest are manual.
//! Every transition moves exactly one step forward.

use crate::error::{Result, ShareCabError};
use crate::progress::MAX_PROGRESS;
use crate::types::RideStatus;

/// Progress past which the driver is considered to be arriving.
pub const ARRIVING_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RideStatus,
    pub to: RideStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMachine {
    current: RideStatus,
}

impl StatusMachine {
    pub const fn new(initial: RideStatus) -> Self {
        Self { current: initial }
    }

    pub const fn current(&self) -> RideStatus {
        self.current
    }

    /// The timer-driven transition `progress` would cause, without applying it.
    pub const fn pending(&self, progress: u8) -> Option<RideStatus> {
        match self.current {
            RideStatus::Assigned if progress > ARRIVING_THRESHOLD => Some(RideStatus::Arriving),
            RideStatus::Arriving if progress >= MAX_PROGRESS => Some(RideStatus::Waiting),
            _ => None,
        }
    }

    /// Apply at most one timer-driven transition for this tick.
    pub fn on_progress(&mut self, progress: u8) -> Option<Transition> {
        let to = self.pending(progress)?;
        let from = self.current;
        self.current = to;
        Some(Transition { from, to })
    }

    pub fn assign_driver(&mut self) -> Result<Transition> {
        self.advance(RideStatus::Searching, RideStatus::Assigned)
    }

    pub fn start_ride(&mut self) -> Result<Transition> {
        self.advance(RideStatus::Waiting, RideStatus::Ongoing)
    }

    /// Only reachable by leaving the ride for the feedback screen.
    pub fn complete(&mut self) -> Result<Transition> {
        self.advance(RideStatus::Ongoing, RideStatus::Completed)
    }

    fn advance(&mut self, expected: RideStatus, to: RideStatus) -> Result<Transition> {
        if self.current != expected {
            return Err(ShareCabError::InvalidTransition {
                from: self.current,
                to,
            });
        }

        self.current = to;
        Ok(Transition { from: expected, to })
    }
}

impl Default for StatusMachine {
    fn default() -> Self {
        Self::new(RideStatus::Assigned)
    }
}
