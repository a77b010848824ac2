//! Control mode and motor kind enums.
//!
//! `ControlMode` is `#[repr(u8)]` and totally ordered: every cascade stage
//! is gated by a `mode >= X` comparison, so a higher mode runs all the
//! processing of the modes below it.

use serde::{Deserialize, Serialize};

/// Cascaded control level (trajectory → position → velocity → current).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ControlMode {
    /// Current setpoint is applied directly (plus cogging compensation).
    Current = 0,
    /// Velocity loop drives the current setpoint.
    Velocity = 1,
    /// Position loop drives the velocity loop.
    #[default]
    Position = 2,
    /// Trajectory planner drives the position loop.
    Trajectory = 3,
}

impl ControlMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Current),
            1 => Some(Self::Velocity),
            2 => Some(Self::Position),
            3 => Some(Self::Trajectory),
            _ => None,
        }
    }
}

/// Motor type tag.
///
/// Only induction motors need the flux estimate, so only that variant
/// carries it. Torque per amp depends on rotor flux for induction motors,
/// which is why the velocity loop rescales its gains for them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MotorKind {
    /// Permanent-magnet synchronous motor.
    #[default]
    PermanentMagnet,
    /// AC induction motor.
    Induction {
        /// Instantaneous rotor flux estimate from the current regulator.
        rotor_flux: f32,
        /// Magnitude floor applied to `rotor_flux` before dividing by it.
        min_flux: f32,
    },
}

impl MotorKind {
    /// Flux used for gain scheduling, or `None` for permanent-magnet motors.
    ///
    /// The returned value keeps the sign of the estimate and has a
    /// magnitude of at least `min_flux`. A zero estimate maps to `+min_flux`.
    #[inline]
    pub fn effective_flux(&self) -> Option<f32> {
        match *self {
            Self::PermanentMagnet => None,
            Self::Induction {
                rotor_flux,
                min_flux,
            } => {
                if rotor_flux.abs() < min_flux {
                    Some(min_flux.copysign(rotor_flux))
                } else {
                    Some(rotor_flux)
                }
            }
        }
    }

    /// True for the induction variant.
    #[inline]
    pub const fn is_induction(&self) -> bool {
        matches!(self, Self::Induction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_order_follows_cascade() {
        assert!(ControlMode::Current < ControlMode::Velocity);
        assert!(ControlMode::Velocity < ControlMode::Position);
        assert!(ControlMode::Position < ControlMode::Trajectory);
        assert!(ControlMode::Trajectory >= ControlMode::Velocity);
    }

    #[test]
    fn mode_from_u8_roundtrip() {
        for m in [
            ControlMode::Current,
            ControlMode::Velocity,
            ControlMode::Position,
            ControlMode::Trajectory,
        ] {
            assert_eq!(ControlMode::from_u8(m as u8), Some(m));
        }
        assert_eq!(ControlMode::from_u8(4), None);
    }

    #[test]
    fn mode_serde_lowercase() {
        #[derive(Deserialize)]
        struct W {
            mode: ControlMode,
        }
        let w: W = toml::from_str("mode = \"trajectory\"").unwrap();
        assert_eq!(w.mode, ControlMode::Trajectory);
    }

    #[test]
    fn pm_motor_has_no_flux() {
        assert_eq!(MotorKind::PermanentMagnet.effective_flux(), None);
        assert!(!MotorKind::PermanentMagnet.is_induction());
    }

    #[test]
    fn induction_flux_floor_preserves_sign() {
        let m = MotorKind::Induction {
            rotor_flux: -0.01,
            min_flux: 0.5,
        };
        assert_eq!(m.effective_flux(), Some(-0.5));

        let m = MotorKind::Induction {
            rotor_flux: 0.0,
            min_flux: 0.5,
        };
        assert_eq!(m.effective_flux(), Some(0.5));

        let m = MotorKind::Induction {
            rotor_flux: 2.0,
            min_flux: 0.5,
        };
        assert_eq!(m.effective_flux(), Some(2.0));
    }
}
