//! Configuration structures for the drive controller.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Numeric parameters have const `MIN`/`MAX` bounds checked by `validate()`.
//! Every field has a `#[serde(default)]` so partial files stay loadable.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{
    COGMAP_CAPACITY, COGMAP_DEFAULT_SIZE, COGMAP_MIN_SIZE, CYCLE_TIME_US, CYCLE_TIME_US_MAX,
    CYCLE_TIME_US_MIN, ENCODER_CPR_DEFAULT, cycle_period_s,
};

use super::state::ControlMode;

/// Upper bound of `vel_limit_tolerance` (0 disables the overspeed check).
pub const VEL_LIMIT_TOLERANCE_MAX: f32 = 10.0;

/// Cogging table storage type. Fixed capacity, never reallocated.
pub type CogTable = heapless::Vec<f32, COGMAP_CAPACITY>;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level drive configuration file.
///
/// ```toml
/// cycle_time_us = 125
///
/// [shared]
/// service_name = "axis0"
///
/// [controller]
/// control_mode = "position"
/// pos_gain = 20.0
///
/// [trajectory]
/// vel_limit = 20000.0
///
/// [motor]
/// kind = "pm"
///
/// [encoder]
/// cpr = 8192
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Logging and instance identity.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Control cycle time in microseconds (default: 125 = 8 kHz).
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u32,

    /// Cascade gains, limits and cogging map settings.
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Trapezoidal planner limits.
    #[serde(default)]
    pub trajectory: TrajectoryConfig,

    /// Motor type and current limit.
    #[serde(default)]
    pub motor: MotorConfig,

    /// Encoder resolution.
    #[serde(default)]
    pub encoder: EncoderConfig,
}

fn default_cycle_time_us() -> u32 {
    CYCLE_TIME_US
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig::default(),
            cycle_time_us: CYCLE_TIME_US,
            controller: ControllerConfig::default(),
            trajectory: TrajectoryConfig::default(),
            motor: MotorConfig::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl DriveConfig {
    /// Run every section's validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.cycle_time_us < CYCLE_TIME_US_MIN || self.cycle_time_us > CYCLE_TIME_US_MAX {
            return Err(ConfigError::ValidationError(format!(
                "cycle_time_us {} out of range [{}, {}]",
                self.cycle_time_us, CYCLE_TIME_US_MIN, CYCLE_TIME_US_MAX
            )));
        }
        self.controller
            .validate()
            .and_then(|()| self.trajectory.validate())
            .and_then(|()| self.motor.validate())
            .and_then(|()| self.encoder.validate())
            .map_err(ConfigError::ValidationError)
    }

    /// Control cycle period [s].
    #[inline]
    pub fn cycle_period(&self) -> f32 {
        cycle_period_s(self.cycle_time_us)
    }
}

// ─── Controller ─────────────────────────────────────────────────────

/// Cascade controller configuration.
///
/// Units follow the position estimate: counts (or turns), counts/s, amps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Mode the controller starts in.
    pub control_mode: ControlMode,
    /// Position gain [(counts/s) / count].
    pub pos_gain: f32,
    /// Velocity proportional gain [A / (counts/s)].
    pub vel_gain: f32,
    /// Velocity integrator gain [A / count].
    pub vel_integrator_gain: f32,
    /// Velocity demand clamp [counts/s].
    pub vel_limit: f32,
    /// Overspeed threshold as a multiple of `vel_limit` (0 = disabled).
    pub vel_limit_tolerance: f32,
    /// Rate-limit velocity setpoint changes in velocity mode.
    pub vel_ramp_enable: bool,
    /// Maximum velocity setpoint slew [counts/s²].
    pub vel_ramp_rate: f32,
    /// Wrap position setpoints modulo one encoder revolution.
    pub setpoints_in_cpr: bool,
    /// Number of cogging-map entries per revolution.
    pub cogmap_size: usize,
    /// Cogging map learning gain [A / count].
    pub cogmap_integrator_gain: f32,
    /// Magnitude bound of each cogging-map entry [A].
    pub cogmap_max_current: f32,
    /// Previously learned cogging map. Length must equal `cogmap_size`.
    pub cogmap: Option<CogTable>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Position,
            pos_gain: 20.0,
            vel_gain: 5.0 / 10_000.0,
            vel_integrator_gain: 10.0 / 10_000.0,
            vel_limit: 20_000.0,
            vel_limit_tolerance: 1.2,
            vel_ramp_enable: false,
            vel_ramp_rate: 10_000.0,
            setpoints_in_cpr: false,
            cogmap_size: COGMAP_DEFAULT_SIZE,
            cogmap_integrator_gain: 0.0,
            cogmap_max_current: 0.5,
            cogmap: None,
        }
    }
}

impl ControllerConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        let gains = [
            ("pos_gain", self.pos_gain),
            ("vel_gain", self.vel_gain),
            ("vel_integrator_gain", self.vel_integrator_gain),
            ("vel_ramp_rate", self.vel_ramp_rate),
            ("cogmap_integrator_gain", self.cogmap_integrator_gain),
            ("cogmap_max_current", self.cogmap_max_current),
        ];
        for (name, value) in gains {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        if !self.vel_limit.is_finite() || self.vel_limit <= 0.0 {
            return Err(format!("vel_limit must be > 0, got {}", self.vel_limit));
        }
        if !(0.0..=VEL_LIMIT_TOLERANCE_MAX).contains(&self.vel_limit_tolerance) {
            return Err(format!(
                "vel_limit_tolerance {} out of range [0, {}]",
                self.vel_limit_tolerance, VEL_LIMIT_TOLERANCE_MAX
            ));
        }
        if self.cogmap_size < COGMAP_MIN_SIZE || self.cogmap_size > COGMAP_CAPACITY {
            return Err(format!(
                "cogmap_size {} out of range [{}, {}]",
                self.cogmap_size, COGMAP_MIN_SIZE, COGMAP_CAPACITY
            ));
        }
        if let Some(ref table) = self.cogmap {
            if table.len() != self.cogmap_size {
                return Err(format!(
                    "cogmap has {} entries, cogmap_size is {}",
                    table.len(),
                    self.cogmap_size
                ));
            }
            if table.iter().any(|v| !v.is_finite()) {
                return Err("cogmap contains non-finite entries".to_string());
            }
        }
        Ok(())
    }
}

// ─── Trajectory ─────────────────────────────────────────────────────

/// Trapezoidal planner limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Cruise velocity [counts/s].
    pub vel_limit: f32,
    /// Acceleration [counts/s²].
    pub accel_limit: f32,
    /// Deceleration [counts/s²].
    pub decel_limit: f32,
    /// Acceleration-to-current feedforward scale [A / (counts/s²)].
    pub a_per_css: f32,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            vel_limit: 20_000.0,
            accel_limit: 5_000.0,
            decel_limit: 5_000.0,
            a_per_css: 0.0,
        }
    }
}

impl TrajectoryConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        let limits = [
            ("trajectory.vel_limit", self.vel_limit),
            ("trajectory.accel_limit", self.accel_limit),
            ("trajectory.decel_limit", self.decel_limit),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be > 0, got {value}"));
            }
        }
        if !self.a_per_css.is_finite() {
            return Err("trajectory.a_per_css must be finite".to_string());
        }
        Ok(())
    }
}

// ─── Motor / Encoder ────────────────────────────────────────────────

/// Motor type as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MotorType {
    /// Permanent-magnet motor.
    #[default]
    Pm,
    /// AC induction motor.
    Induction,
}

/// Motor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Motor type.
    pub kind: MotorType,
    /// Configured current limit [A].
    pub current_lim: f32,
    /// Flux floor for induction-motor gain scheduling.
    pub acim_gain_min_flux: f32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            kind: MotorType::Pm,
            current_lim: 10.0,
            acim_gain_min_flux: 10.0,
        }
    }
}

impl MotorConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !self.current_lim.is_finite() || self.current_lim <= 0.0 {
            return Err(format!(
                "motor.current_lim must be > 0, got {}",
                self.current_lim
            ));
        }
        if !self.acim_gain_min_flux.is_finite() || self.acim_gain_min_flux <= 0.0 {
            return Err(format!(
                "motor.acim_gain_min_flux must be > 0, got {}",
                self.acim_gain_min_flux
            ));
        }
        Ok(())
    }
}

/// Encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Counts per revolution.
    pub cpr: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            cpr: ENCODER_CPR_DEFAULT,
        }
    }
}

impl EncoderConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.cpr == 0 {
            return Err("encoder.cpr must be > 0".to_string());
        }
        Ok(())
    }
}
