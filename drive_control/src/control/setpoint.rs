//! Working setpoints and the upstream sources that produce them.
//!
//! Position, velocity and current setpoints are written directly by the
//! command interface, sampled from the trajectory planner, or slewed by the
//! velocity ramp. Downstream stages only ever read them.

use crate::math::clamp_bidir;
use crate::trajectory::TrajectoryStep;

/// Position / velocity / current targets for the current cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Setpoints {
    /// Position target [counts].
    pub pos: f32,
    /// Velocity target or feedforward [counts/s].
    pub vel: f32,
    /// Current target or feedforward [A].
    pub current: f32,
}

impl Setpoints {
    /// Zero all three targets.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Take position and velocity from a trajectory sample and turn its
    /// acceleration into a current feedforward.
    #[inline]
    pub fn follow(&mut self, step: &TrajectoryStep, a_per_css: f32) {
        self.pos = step.position;
        self.vel = step.velocity;
        self.current = step.acceleration * a_per_css;
    }

    /// Trajectory finished: hold the last position with no motion feedforward.
    #[inline]
    pub fn hold(&mut self) {
        self.vel = 0.0;
        self.current = 0.0;
    }

    /// Move `vel` toward `target` by at most `max_step`.
    #[inline]
    pub fn ramp_velocity(&mut self, target: f32, max_step: f32) {
        self.vel += clamp_bidir(target - self.vel, max_step);
    }
}
