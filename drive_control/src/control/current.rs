//! Current synthesis limiting.
//!
//! The accumulated current command (feedforward + cogging + proportional +
//! integrator) is clamped to the actuator's instantaneous capability. The
//! clamp flag feeds the anti-windup integrator.

/// Clamped current command for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitedCurrent {
    /// Output current [A], `|value| <= limit`.
    pub value: f32,
    /// True when the raw command exceeded the limit.
    pub limited: bool,
}

/// Clamp `iq` symmetrically to `±ilim`.
#[inline]
pub fn limit_current(iq: f32, ilim: f32) -> LimitedCurrent {
    if iq > ilim {
        LimitedCurrent {
            value: ilim,
            limited: true,
        }
    } else if iq < -ilim {
        LimitedCurrent {
            value: -ilim,
            limited: true,
        }
    } else {
        LimitedCurrent {
            value: iq,
            limited: false,
        }
    }
}
