//! Velocity loop helpers: demand limiting, overspeed detection and
//! induction-motor gain scheduling.

use drive_common::controller::state::MotorKind;

use crate::math::clamp_bidir;

/// Velocity-loop gains for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityGains {
    /// Proportional gain [A / (counts/s)].
    pub vel_gain: f32,
    /// Integrator gain [A / count].
    pub vel_integrator_gain: f32,
}

impl VelocityGains {
    /// Rescale for the motor's torque-per-amp.
    ///
    /// Permanent-magnet motors return the gains unchanged. Induction motors
    /// divide both gains by the floored rotor-flux estimate.
    #[inline]
    pub fn scheduled(self, motor: &MotorKind) -> Self {
        match motor.effective_flux() {
            None => self,
            Some(flux) => Self {
                vel_gain: self.vel_gain / flux,
                vel_integrator_gain: self.vel_integrator_gain / flux,
            },
        }
    }
}

/// Clamp the velocity demand to `±vel_limit`.
#[inline]
pub fn limit_velocity(vel_des: f32, vel_limit: f32) -> f32 {
    clamp_bidir(vel_des, vel_limit)
}

/// Overspeed check. A non-positive `tolerance` disables it.
///
/// Trips when `|vel_estimate| > tolerance × vel_limit`.
#[inline]
pub fn is_overspeed(vel_estimate: f32, vel_limit: f32, tolerance: f32) -> bool {
    tolerance > 0.0 && vel_estimate.abs() > tolerance * vel_limit
}
