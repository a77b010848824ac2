//! Drive Common Library
//!
//! Shared constants, configuration loading and fault definitions for the
//! drive controller workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Cycle timing and cogging-map sizing constants
//! - [`config`] - Configuration loading traits and types
//! - [`controller`] - Control mode, motor kind, fault bitflags and controller configuration
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use drive_common::prelude::*;
//!
//! let cfg = ControllerConfig::default();
//! assert!(cfg.validate().is_ok());
//! assert!(ControlMode::Trajectory > ControlMode::Velocity);
//! ```

pub mod config;
pub mod consts;
pub mod controller;
pub mod prelude;
