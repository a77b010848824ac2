//! Controller-facing shared types.
//!
//! - [`state`] - `ControlMode` cascade ordering and `MotorKind`
//! - [`error`] - Sticky fault bitflags for the controller and its owning axis
//! - [`config`] - Serde configuration structs with bounds validation

pub mod config;
pub mod error;
pub mod state;
