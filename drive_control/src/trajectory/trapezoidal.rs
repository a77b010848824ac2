//! Trapezoidal (bounded-acceleration) motion profile.
//!
//! Three phases: accelerate from the start velocity to the cruise velocity,
//! cruise, decelerate to rest on the target. Short moves that never reach
//! cruise collapse into a triangle. A start velocity above cruise (in the
//! direction of travel) first decelerates down to cruise.
//!
//! The start velocity is honoured, so re-planning mid-move (e.g. a new
//! `move_to_pos` while a trajectory runs) produces no velocity step.

use drive_common::controller::config::TrajectoryConfig;

use super::{TrajectoryPlanner, TrajectoryStep};
use crate::math::sign_hard;

/// Planned trapezoidal profile plus the limits it is planned with.
#[derive(Debug, Clone)]
pub struct TrapezoidalTrajectory {
    config: TrajectoryConfig,
    xi: f32,
    xf: f32,
    vi: f32,
    /// Signed acceleration of the first phase.
    ar: f32,
    /// Signed cruise velocity.
    vr: f32,
    /// Signed deceleration of the last phase.
    dr: f32,
    ta: f32,
    tv: f32,
    td: f32,
    tf: f32,
    /// Position at the end of the first phase.
    y_accel: f32,
}

impl TrapezoidalTrajectory {
    /// Idle planner: zero-length profile at the origin.
    pub fn new(config: TrajectoryConfig) -> Self {
        Self {
            config,
            xi: 0.0,
            xf: 0.0,
            vi: 0.0,
            ar: 0.0,
            vr: 0.0,
            dr: 0.0,
            ta: 0.0,
            tv: 0.0,
            td: 0.0,
            tf: 0.0,
            y_accel: 0.0,
        }
    }

    /// Replace the planner limits. Takes effect on the next `plan`.
    pub fn set_limits(&mut self, config: TrajectoryConfig) {
        self.config = config;
    }

    /// Phase durations `(accel, cruise, decel)` [s].
    pub fn phases(&self) -> (f32, f32, f32) {
        (self.ta, self.tv, self.td)
    }
}

impl TrajectoryPlanner for TrapezoidalTrajectory {
    fn limits(&self) -> &TrajectoryConfig {
        &self.config
    }

    fn plan(
        &mut self,
        target: f32,
        start_pos: f32,
        start_vel: f32,
        vel_limit: f32,
        accel_limit: f32,
        decel_limit: f32,
    ) -> f32 {
        let dx = target - start_pos;
        let vi = start_vel;

        // Displacement needed just to stop from the start velocity.
        let stop_dist = vi * vi / (2.0 * decel_limit);
        let dx_stop = stop_dist.copysign(vi);
        let s = sign_hard(dx - dx_stop);

        let mut ar = s * accel_limit;
        let dr = -s * decel_limit;
        let mut vr = s * vel_limit;

        // Starting above cruise speed: the first phase decelerates.
        if s * vi > s * vr {
            ar = -s * accel_limit;
        }

        let mut ta = (vr - vi) / ar;
        let mut td = -vr / dr;
        let dx_min = 0.5 * ta * (vr + vi) + 0.5 * td * vr;

        let tv = if s * dx < s * dx_min {
            // Triangle: peak velocity below cruise.
            let den = dr - ar;
            let v_sq = if den != 0.0 {
                (dr * vi * vi + 2.0 * ar * dr * dx) / den
            } else {
                0.0
            };
            vr = s * v_sq.max(0.0).sqrt();
            ta = ((vr - vi) / ar).max(0.0);
            td = (-vr / dr).max(0.0);
            0.0
        } else {
            (dx - dx_min) / vr
        };

        self.xi = start_pos;
        self.xf = target;
        self.vi = vi;
        self.ar = ar;
        self.vr = vr;
        self.dr = dr;
        self.ta = ta;
        self.tv = tv;
        self.td = td;
        self.tf = ta + tv + td;
        self.y_accel = start_pos + vi * ta + 0.5 * ar * ta * ta;
        self.tf
    }

    fn duration(&self) -> f32 {
        self.tf
    }

    fn sample(&self, t: f32) -> TrajectoryStep {
        if t < 0.0 {
            TrajectoryStep {
                position: self.xi,
                velocity: self.vi,
                acceleration: 0.0,
            }
        } else if t < self.ta {
            TrajectoryStep {
                position: self.xi + self.vi * t + 0.5 * self.ar * t * t,
                velocity: self.vi + self.ar * t,
                acceleration: self.ar,
            }
        } else if t < self.ta + self.tv {
            TrajectoryStep {
                position: self.y_accel + self.vr * (t - self.ta),
                velocity: self.vr,
                acceleration: 0.0,
            }
        } else if t < self.tf {
            let td = t - self.tf;
            TrajectoryStep {
                position: self.xf + 0.5 * self.dr * td * td,
                velocity: self.dr * td,
                acceleration: self.dr,
            }
        } else {
            TrajectoryStep {
                position: self.xf,
                velocity: 0.0,
                acceleration: 0.0,
            }
        }
    }
}
