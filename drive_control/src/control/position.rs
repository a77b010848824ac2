//! Position loop: position error → velocity demand correction.
//!
//! Two error sources:
//! - **Linear**: `setpoint − pos_estimate`.
//! - **Circular** (`setpoints_in_cpr`): the setpoint is normalised into
//!   `[0, cpr)` and compared against the encoder's own circular position,
//!   not the estimate passed into `update`. The error is wrapped into
//!   `[−cpr/2, cpr/2)` so the axis takes the shortest way round.

use crate::math::{fmod_pos, wrap_pm};

/// Linear position error.
#[inline]
pub fn linear_error(pos_setpoint: f32, pos_estimate: f32) -> f32 {
    pos_setpoint - pos_estimate
}

/// Circular position error.
///
/// Normalises `pos_setpoint` in place so it cannot drift without bound
/// over many revolutions.
///
/// # Arguments
/// - `pos_setpoint`: Setpoint [counts], rewritten into `[0, cpr)`.
/// - `encoder_pos_cpr`: Encoder position within one revolution [counts].
/// - `cpr`: Counts per revolution.
///
/// # Returns
/// Shortest-path error in `[−cpr/2, cpr/2)`.
#[inline]
pub fn circular_error(pos_setpoint: &mut f32, encoder_pos_cpr: f32, cpr: f32) -> f32 {
    *pos_setpoint = fmod_pos(*pos_setpoint, cpr);
    wrap_pm(*pos_setpoint - encoder_pos_cpr, 0.5 * cpr)
}

/// Velocity demand from the position loop.
#[inline]
pub fn velocity_demand(vel_setpoint: f32, pos_gain: f32, pos_error: f32) -> f32 {
    vel_setpoint + pos_gain * pos_error
}
