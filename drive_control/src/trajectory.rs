//! Trajectory planner interface.
//!
//! The controller only needs two things from a planner: plan a move from a
//! start state to a target and report its duration, then sample the
//! profile at an elapsed time. [`TrapezoidalTrajectory`] is the reference
//! implementation.

pub mod trapezoidal;

pub use trapezoidal::TrapezoidalTrajectory;

use drive_common::controller::config::TrajectoryConfig;

/// One sample of a motion profile.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrajectoryStep {
    /// Position [counts].
    pub position: f32,
    /// Velocity [counts/s].
    pub velocity: f32,
    /// Acceleration [counts/s²].
    pub acceleration: f32,
}

/// Motion profile generator used by trajectory mode.
pub trait TrajectoryPlanner {
    /// Configured limits and acceleration feedforward scale.
    fn limits(&self) -> &TrajectoryConfig;

    /// Plan a move and return its total duration [s].
    fn plan(
        &mut self,
        target: f32,
        start_pos: f32,
        start_vel: f32,
        vel_limit: f32,
        accel_limit: f32,
        decel_limit: f32,
    ) -> f32;

    /// Duration of the most recently planned move [s].
    fn duration(&self) -> f32;

    /// Sample the planned profile at elapsed time `t` [s].
    fn sample(&self, t: f32) -> TrajectoryStep;
}
