//! Prelude module for common re-exports.
//!
//! ```rust
//! use drive_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::controller::config::{
    ControllerConfig, DriveConfig, EncoderConfig, MotorConfig, MotorType, TrajectoryConfig,
};

// ─── Controller Types ───────────────────────────────────────────────
pub use crate::controller::error::{AxisError, ControllerError};
pub use crate::controller::state::{ControlMode, MotorKind};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{COGMAP_CAPACITY, CYCLE_TIME_US};
