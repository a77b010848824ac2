//! Rigid-rotor plant model.
//!
//! `J·dω/dt = kt·i − b·ω + τ_cog(θ)`, integrated with forward Euler in
//! encoder units (counts, counts/s). The cogging torque is a sinusoid with
//! a whole number of periods per revolution, which is exactly what the
//! controller's cogging map learns to cancel.
//!
//! Used by the demo binary, integration tests and benches in place of a
//! real motor and encoder.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::axis::EncoderState;

/// Physical parameters of the simulated rotor.
///
/// ```toml
/// [plant]
/// inertia = 1e-5
/// torque_constant = 1.0
/// damping = 1e-6
/// cogging_torque = 0.02
/// cogging_periods = 12
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParams {
    /// Rotor inertia [torque·s² / count].
    pub inertia: f32,
    /// Torque per amp [torque / A].
    pub torque_constant: f32,
    /// Viscous friction [torque·s / count].
    pub damping: f32,
    /// Cogging torque amplitude [torque].
    pub cogging_torque: f32,
    /// Cogging periods per mechanical revolution.
    pub cogging_periods: u32,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            inertia: 1e-5,
            torque_constant: 1.0,
            damping: 1e-6,
            cogging_torque: 0.0,
            cogging_periods: 12,
        }
    }
}

impl PlantParams {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !self.inertia.is_finite() || self.inertia <= 0.0 {
            return Err(format!("plant.inertia must be > 0, got {}", self.inertia));
        }
        for (name, value) in [
            ("torque_constant", self.torque_constant),
            ("damping", self.damping),
            ("cogging_torque", self.cogging_torque),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("plant.{name} must be finite and >= 0, got {value}"));
            }
        }
        Ok(())
    }
}

/// Simulated motor plus encoder.
#[derive(Debug, Clone)]
pub struct PlantModel {
    params: PlantParams,
    cpr: u32,
    /// Shaft position [counts].
    position: f32,
    /// Shaft velocity [counts/s].
    velocity: f32,
}

impl PlantModel {
    /// Rotor at rest at position zero.
    pub fn new(params: PlantParams, cpr: u32) -> Self {
        Self {
            params,
            cpr,
            position: 0.0,
            velocity: 0.0,
        }
    }

    /// Overwrite position and velocity.
    pub fn set_state(&mut self, position: f32, velocity: f32) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Cogging torque at `position` [torque].
    pub fn cogging_torque(&self, position: f32) -> f32 {
        if self.params.cogging_periods == 0 || self.cpr == 0 {
            return 0.0;
        }
        let angle = TAU * self.params.cogging_periods as f32 * position / self.cpr as f32;
        self.params.cogging_torque * angle.sin()
    }

    /// Advance by `dt` seconds with `current` [A] applied.
    pub fn step(&mut self, current: f32, dt: f32) {
        let p = &self.params;
        let torque =
            p.torque_constant * current - p.damping * self.velocity + self.cogging_torque(self.position);
        let accel = torque / p.inertia;
        self.position += self.velocity * dt;
        self.velocity += accel * dt;
    }

    /// Shaft position [counts].
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Shaft velocity [counts/s].
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Encoder readings for the current shaft position.
    pub fn encoder_state(&self) -> EncoderState {
        let cpr = self.cpr.max(1);
        let pos_cpr = self.position.rem_euclid(cpr as f32);
        let count = self.position.floor() as i64;
        EncoderState {
            cpr,
            count_in_cpr: count.rem_euclid(i64::from(cpr)) as i32,
            pos_cpr,
        }
    }

    #[inline]
    pub fn params(&self) -> &PlantParams {
        &self.params
    }
}
