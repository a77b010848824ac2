//! Velocity integrator with decay-on-saturation anti-windup.
//!
//! Behaviour per cycle, after current limiting:
//! - mode below velocity: held at zero (the loop is not closed).
//! - output clamped: decays by `VEL_INTEGRATOR_DECAY` instead of growing.
//! - otherwise: `+= Ki × dt × v_err` (forward Euler).

use drive_common::consts::VEL_INTEGRATOR_DECAY;
use drive_common::controller::state::ControlMode;

/// Accumulated velocity-error integral, in amps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityIntegrator {
    current: f32,
}

impl VelocityIntegrator {
    /// Integral contribution to the current command [A].
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Reset to zero.
    #[inline]
    pub fn reset(&mut self) {
        self.current = 0.0;
    }

    /// Advance one cycle.
    ///
    /// # Arguments
    /// - `mode`: Active control mode.
    /// - `limited`: Whether this cycle's current output was clamped.
    /// - `gain`: Integrator gain after gain scheduling.
    /// - `dt`: Cycle period [s].
    /// - `v_err`: Velocity error [counts/s].
    #[inline]
    pub fn update(&mut self, mode: ControlMode, limited: bool, gain: f32, dt: f32, v_err: f32) {
        if mode < ControlMode::Velocity {
            self.current = 0.0;
        } else if limited {
            self.current *= VEL_INTEGRATOR_DECAY;
        } else {
            self.current += (gain * dt) * v_err;
        }
    }
}
