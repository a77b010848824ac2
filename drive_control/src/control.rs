//! Control engine root.
//!
//! Cascaded trajectory → position → velocity → current controller with
//! online cogging compensation. The stages live in their own modules and
//! [`controller::Controller`] wires them together once per cycle.

pub mod cogging;
pub mod controller;
pub mod current;
pub mod integrator;
pub mod position;
pub mod setpoint;
pub mod velocity;

pub use controller::Controller;
