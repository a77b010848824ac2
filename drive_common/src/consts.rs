//! System-wide constants for the drive workspace.
//!
//! Single source of truth for cycle timing, cogging-map sizing and the
//! fixed filter constants of the velocity loop.

use static_assertions::const_assert;

/// Default control cycle time in microseconds (8 kHz current measurement).
pub const CYCLE_TIME_US: u32 = 125;

/// Minimum accepted control cycle time [µs].
pub const CYCLE_TIME_US_MIN: u32 = 50;

/// Maximum accepted control cycle time [µs].
pub const CYCLE_TIME_US_MAX: u32 = 10_000;

/// Storage capacity of the cogging map. The configured size may be smaller.
pub const COGMAP_CAPACITY: usize = 4096;

/// Default number of cogging-map entries per revolution.
pub const COGMAP_DEFAULT_SIZE: usize = 1024;

/// Smallest usable cogging map (interpolation needs two entries).
pub const COGMAP_MIN_SIZE: usize = 2;

/// Per-cycle decay applied to the velocity integrator while the output is clamped.
pub const VEL_INTEGRATOR_DECAY: f32 = 0.99;

/// Smoothing factor of the cogging correction power estimate.
pub const COGMAP_PWR_ALPHA: f32 = 0.001;

/// Default encoder counts per revolution.
pub const ENCODER_CPR_DEFAULT: u32 = 8192;

const_assert!(COGMAP_DEFAULT_SIZE <= COGMAP_CAPACITY);
const_assert!(COGMAP_MIN_SIZE <= COGMAP_DEFAULT_SIZE);
const_assert!(CYCLE_TIME_US_MIN <= CYCLE_TIME_US && CYCLE_TIME_US <= CYCLE_TIME_US_MAX);

/// Convert a cycle time in microseconds to seconds.
#[inline]
pub fn cycle_period_s(cycle_time_us: u32) -> f32 {
    cycle_time_us as f32 * 1e-6
}
