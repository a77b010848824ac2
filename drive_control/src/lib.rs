//! # Drive Control Library
//!
//! Closed-loop control core of a single motor axis. Once per fixed control
//! cycle it turns a position/velocity estimate into the current (torque)
//! setpoint handed to the current regulator.
//!
//! ## Cascade
//!
//! 1. **Trajectory** — trapezoidal planner feeds position, velocity and
//!    acceleration feedforward
//! 2. **Position** — P loop, linear or wrapped to one encoder revolution
//! 3. **Velocity** — PI loop with decay anti-windup and overspeed fault
//! 4. **Current** — feedforward plus learned cogging compensation, clamped
//!    to the motor's instantaneous limit
//!
//! ## Zero-Allocation Cycle
//!
//! All controller state, the cogging map included, is sized at startup.
//! [`control::Controller::update`] performs no allocation and does not block.

pub mod axis;
pub mod config;
pub mod control;
pub mod math;
pub mod sim;
pub mod trajectory;
