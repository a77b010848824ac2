//! Axis collaborators of the controller.
//!
//! The controller never stores a reference to the axis that owns it.
//! Instead every operation that needs the axis receives it as a
//! `&mut impl AxisHandle` for the duration of the call: loop counter,
//! encoder and motor state are read through it, the trajectory planner is
//! driven through it, and controller faults are raised on it.
//!
//! [`Axis`] is the reference owner: it holds the controller next to its
//! [`AxisPeripherals`] so the two can be borrowed disjointly each cycle.

use drive_common::controller::config::{DriveConfig, MotorType};
use drive_common::controller::error::AxisError;
use drive_common::controller::state::MotorKind;
use tracing::info;

use crate::control::controller::Controller;
use crate::trajectory::{TrajectoryPlanner, TrapezoidalTrajectory};

/// Encoder readings for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderState {
    /// Counts per revolution.
    pub cpr: u32,
    /// Raw count within one revolution, `[0, cpr)`.
    pub count_in_cpr: i32,
    /// Interpolated/filtered position within one revolution [counts].
    pub pos_cpr: f32,
}

impl EncoderState {
    /// Encoder at count zero.
    pub const fn new(cpr: u32) -> Self {
        Self {
            cpr,
            count_in_cpr: 0,
            pos_cpr: 0.0,
        }
    }
}

/// Motor metadata and current capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorState {
    /// Motor type, with the flux estimate for induction motors.
    pub kind: MotorKind,
    /// Configured current limit [A].
    pub current_lim: f32,
    /// Hardware/derating ceiling computed by the driver [A].
    pub max_allowed_current: f32,
}

impl MotorState {
    /// Instantaneous current the controller may command [A].
    #[inline]
    pub fn effective_current_limit(&self) -> f32 {
        self.current_lim.min(self.max_allowed_current)
    }
}

/// What the controller needs from its owning axis.
pub trait AxisHandle {
    /// Planner driven in trajectory mode.
    type Planner: TrajectoryPlanner;

    /// Monotonic, wrapping control cycle counter.
    fn loop_counter(&self) -> u32;

    /// Encoder state for this cycle.
    fn encoder(&self) -> &EncoderState;

    /// Motor state for this cycle.
    fn motor(&self) -> &MotorState;

    /// Trajectory planner.
    fn planner(&self) -> &Self::Planner;

    /// Trajectory planner, mutable for planning.
    fn planner_mut(&mut self) -> &mut Self::Planner;

    /// Latch an axis-level fault.
    fn raise(&mut self, error: AxisError);
}

/// Everything an axis owns besides the controller.
#[derive(Debug, Clone)]
pub struct AxisPeripherals<P: TrajectoryPlanner = TrapezoidalTrajectory> {
    /// Control cycle counter, incremented after each update.
    pub loop_counter: u32,
    /// Sticky axis fault set.
    pub error: AxisError,
    /// Latest encoder readings.
    pub encoder: EncoderState,
    /// Latest motor state.
    pub motor: MotorState,
    /// Trajectory planner.
    pub planner: P,
}

impl<P: TrajectoryPlanner> AxisHandle for AxisPeripherals<P> {
    type Planner = P;

    #[inline]
    fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    #[inline]
    fn encoder(&self) -> &EncoderState {
        &self.encoder
    }

    #[inline]
    fn motor(&self) -> &MotorState {
        &self.motor
    }

    #[inline]
    fn planner(&self) -> &P {
        &self.planner
    }

    #[inline]
    fn planner_mut(&mut self) -> &mut P {
        &mut self.planner
    }

    #[inline]
    fn raise(&mut self, error: AxisError) {
        self.error |= error;
    }
}

impl AxisPeripherals<TrapezoidalTrajectory> {
    /// Peripherals from a validated drive configuration.
    pub fn from_config(config: &DriveConfig) -> Self {
        let kind = match config.motor.kind {
            MotorType::Pm => MotorKind::PermanentMagnet,
            MotorType::Induction => MotorKind::Induction {
                rotor_flux: 0.0,
                min_flux: config.motor.acim_gain_min_flux,
            },
        };
        Self {
            loop_counter: 0,
            error: AxisError::empty(),
            encoder: EncoderState::new(config.encoder.cpr),
            motor: MotorState {
                kind,
                current_lim: config.motor.current_lim,
                max_allowed_current: config.motor.current_lim,
            },
            planner: TrapezoidalTrajectory::new(config.trajectory),
        }
    }
}

/// Reference axis: a controller plus the peripherals it reads.
#[derive(Debug, Clone)]
pub struct Axis<P: TrajectoryPlanner = TrapezoidalTrajectory> {
    /// Cascade controller.
    pub controller: Controller,
    /// Loop counter, fault set, encoder, motor and planner.
    pub peripherals: AxisPeripherals<P>,
}

impl<P: TrajectoryPlanner> Axis<P> {
    /// Assemble an axis from its parts.
    pub fn new(controller: Controller, peripherals: AxisPeripherals<P>) -> Self {
        Self {
            controller,
            peripherals,
        }
    }

    /// Run one control cycle and advance the loop counter.
    ///
    /// Returns the current setpoint, or `None` if the controller faulted
    /// this cycle.
    #[inline]
    pub fn step(&mut self, pos_estimate: f32, vel_estimate: f32) -> Option<f32> {
        let out = self
            .controller
            .update(&mut self.peripherals, pos_estimate, vel_estimate);
        self.peripherals.loop_counter = self.peripherals.loop_counter.wrapping_add(1);
        out
    }

    /// Start a trajectory to `goal_point`.
    pub fn move_to_pos(&mut self, goal_point: f32) {
        self.controller
            .move_to_pos(&mut self.peripherals, goal_point);
    }

    /// Start a relative trajectory.
    pub fn move_incremental(&mut self, displacement: f32, from_goal_point: bool) {
        self.controller
            .move_incremental(&mut self.peripherals, displacement, from_goal_point);
    }

    /// Sticky axis fault set.
    #[inline]
    pub fn error(&self) -> AxisError {
        self.peripherals.error
    }

    /// Clear the axis and controller fault sets.
    pub fn clear_errors(&mut self) {
        if !self.peripherals.error.is_empty() {
            info!(axis_error = ?self.peripherals.error, controller_error = ?self.controller.error(), "clearing faults");
        }
        self.peripherals.error = AxisError::empty();
        self.controller.clear_errors();
    }
}
