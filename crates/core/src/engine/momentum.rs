use serde::{Deserialize, Serialize};

use super::snap::clamp_offset;
use crate::model::MomentumConfig;

/// Identifies one scheduled momentum tick.
///
/// Every tick and every cancellation moves to a fresh token, so a refresh
/// callback the host delivers late is recognised as stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn id(self) -> u64 {
        self.0
    }

    pub(crate) fn first() -> Self {
        FrameToken(1)
    }

    pub(crate) fn next(self) -> Self {
        FrameToken(self.0.wrapping_add(1))
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MomentumStep {
    /// Offset moved (possibly pinned at a boundary); another tick follows.
    Advance { offset: f64 },
    /// Velocity is spent; the caller snaps.
    Settle,
}

/// Post-release inertia.
///
/// Only velocity lives here; the offset it drives stays owned by the
/// picker and is passed in on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumRun {
    velocity: f64,
    token: FrameToken,
    ticks: u32,
}

impl MomentumRun {
    pub fn start(velocity: f64, token: FrameToken) -> Self {
        Self {
            velocity,
            token,
            ticks: 0,
        }
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn token(&self) -> FrameToken {
        self.token
    }

    /// Ticks that moved the offset so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Advance one frame.
    ///
    /// Hitting a boundary pins the offset but keeps the velocity decaying,
    /// so a run that reaches an end coasts against it until the velocity
    /// drops under the stop threshold.
    pub fn step(&mut self, offset: f64, max_offset: f64, config: &MomentumConfig) -> MomentumStep {
        if self.velocity.abs() <= config.stop_threshold {
            return MomentumStep::Settle;
        }
        let offset = clamp_offset(offset + self.velocity, max_offset);
        self.velocity *= config.decay;
        self.ticks += 1;
        self.token = self.token.next();
        MomentumStep::Advance { offset }
    }
}
