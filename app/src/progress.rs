use crate::types::RideSession;

pub const MAX_PROGRESS: u8 = 100;

/// Advances a ride's progress, ETA and driver position one tick at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressClock {
    step: u8,
    location_step: f64,
}

impl ProgressClock {
    pub fn new(step: u8, location_step: f64) -> Self {
        Self {
            step: step.clamp(1, MAX_PROGRESS),
            location_step,
        }
    }

    /// Apply one tick. Returns `false` without touching the session once
    /// progress is already complete.
    pub fn advance(&self, session: &mut RideSession) -> bool {
        if Self::is_complete(session) {
            return false;
        }

        session.progress = session.progress.saturating_add(self.step).min(MAX_PROGRESS);
        session.estimated_time_remaining = session.estimated_time_remaining.count_down();
        session.driver_location = session.driver_location.offset(self.location_step);
        true
    }

    pub fn is_complete(session: &RideSession) -> bool {
        session.progress >= MAX_PROGRESS
    }

    /// Ticks needed to bring `progress` to completion.
    pub fn ticks_remaining(&self, progress: u8) -> u32 {
        let left = u32::from(MAX_PROGRESS.saturating_sub(progress));
        left.div_ceil(u32::from(self.step))
    }
}
