//! Fault bitflag types.
//!
//! Each subsystem owns its own sticky fault set. A controller fault is
//! propagated upward by raising `AxisError::CONTROLLER_FAILED` on the owning
//! axis, so supervisory logic can react without knowing the specific kind.

use bitflags::bitflags;

bitflags! {
    /// Controller fault flags. Sticky until explicitly cleared.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControllerError: u16 {
        /// Velocity estimate exceeded `vel_limit_tolerance × vel_limit`.
        const OVERSPEED = 0x0001;
    }
}

impl Default for ControllerError {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Axis-level fault flags raised by the subsystems an axis owns.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisError: u32 {
        /// The controller latched a fault; see its `ControllerError` set.
        const CONTROLLER_FAILED = 0x0000_0001;
    }
}

impl Default for AxisError {
    fn default() -> Self {
        Self::empty()
    }
}
