//! Cascaded trajectory → position → velocity → current controller.
//!
//! [`Controller::update`] runs once per control cycle and turns the
//! position/velocity estimates into a current (torque) setpoint:
//!
//! 1. Trajectory sampling (trajectory mode)
//! 2. Velocity ramp (velocity mode, ramp enabled)
//! 3. Position loop (mode ≥ position), linear or circular error
//! 4. Velocity demand limit
//! 5. Overspeed check → fault, invalid output
//! 6. Induction-motor gain scheduling
//! 7. Current feedforward
//! 8. Cogging compensation lookup
//! 9. Velocity P term + online cogging adaptation (mode ≥ velocity)
//! 10. Integrator feed-in
//! 11. Current limit
//! 12. Anti-windup integrator update
//!
//! Every stage is gated by a `mode >= X` comparison on the ordered
//! [`ControlMode`], so a higher mode reuses the whole pipeline below it and
//! switching mode only changes which setpoints are produced upstream.
//!
//! ## Zero-Allocation Update
//!
//! `update` performs no allocation and no logging on the success path. The
//! setpoint commands log at `debug` level; they run in command context.

use drive_common::controller::config::ControllerConfig;
use drive_common::controller::error::{AxisError, ControllerError};
use drive_common::controller::state::ControlMode;
use tracing::{debug, warn};

use super::cogging::{CogMap, CogMapError, CorrectionPower};
use super::current::limit_current;
use super::integrator::VelocityIntegrator;
use super::position::{circular_error, linear_error, velocity_demand};
use super::setpoint::Setpoints;
use super::velocity::{VelocityGains, is_overspeed, limit_velocity};
use crate::axis::AxisHandle;
use crate::trajectory::TrajectoryPlanner;

/// Per-axis controller state.
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    /// Control cycle period [s].
    cycle_period: f32,
    mode: ControlMode,
    setpoints: Setpoints,
    vel_ramp_target: f32,
    integrator: VelocityIntegrator,
    goal_point: f32,
    traj_start_loop_count: u32,
    cogmap: CogMap,
    cogmap_current: f32,
    correction_power: CorrectionPower,
    error: ControllerError,
}

impl Controller {
    /// Build a controller from its configuration.
    ///
    /// A configured `cogmap` table seeds the cogging map; otherwise a
    /// zero-filled map of `cogmap_size` entries is created. The table is
    /// moved out of the stored configuration.
    ///
    /// # Errors
    /// `CogMapError::InvalidSize` if `cogmap_size` is out of range,
    /// `CogMapError::LengthMismatch` if a preloaded table does not have
    /// exactly `cogmap_size` entries.
    pub fn new(mut config: ControllerConfig, cycle_period: f32) -> Result<Self, CogMapError> {
        let cogmap = match config.cogmap.take() {
            Some(table) if table.len() != config.cogmap_size => {
                return Err(CogMapError::LengthMismatch {
                    len: table.len(),
                    size: config.cogmap_size,
                });
            }
            Some(table) => CogMap::from_table(&table)?,
            None => CogMap::new(config.cogmap_size)?,
        };
        Ok(Self {
            mode: config.control_mode,
            config,
            cycle_period,
            setpoints: Setpoints::default(),
            vel_ramp_target: 0.0,
            integrator: VelocityIntegrator::default(),
            goal_point: 0.0,
            traj_start_loop_count: 0,
            cogmap,
            cogmap_current: 0.0,
            correction_power: CorrectionPower::default(),
            error: ControllerError::empty(),
        })
    }

    /// Zero position/velocity/current setpoints and the integrator.
    ///
    /// Mode and fault state are left untouched.
    pub fn reset(&mut self) {
        self.setpoints.reset();
        self.integrator.reset();
    }

    fn set_error<A: AxisHandle>(&mut self, axis: &mut A, error: ControllerError) {
        if !self.error.contains(error) {
            warn!(?error, "controller fault latched");
        }
        self.error |= error;
        axis.raise(AxisError::CONTROLLER_FAILED);
    }

    /// Clear the sticky fault set.
    pub fn clear_errors(&mut self) {
        self.error = ControllerError::empty();
    }

    // ─── Command Handling ───────────────────────────────────────────

    /// Position mode with velocity and current feedforward.
    pub fn set_pos_setpoint(&mut self, pos_setpoint: f32, vel_feed_forward: f32, current_feed_forward: f32) {
        self.setpoints = Setpoints {
            pos: pos_setpoint,
            vel: vel_feed_forward,
            current: current_feed_forward,
        };
        self.mode = ControlMode::Position;
        debug!(pos_setpoint, vel_feed_forward, current_feed_forward, "position control");
    }

    /// Velocity mode with current feedforward.
    pub fn set_vel_setpoint(&mut self, vel_setpoint: f32, current_feed_forward: f32) {
        self.setpoints.vel = vel_setpoint;
        self.setpoints.current = current_feed_forward;
        self.mode = ControlMode::Velocity;
        debug!(vel_setpoint, current_feed_forward, "velocity control");
    }

    /// Current mode.
    pub fn set_current_setpoint(&mut self, current_setpoint: f32) {
        self.setpoints.current = current_setpoint;
        self.mode = ControlMode::Current;
        debug!(current_setpoint, "current control");
    }

    /// Target the velocity ramp slews toward (velocity mode, ramp enabled).
    pub fn set_vel_ramp_target(&mut self, vel_ramp_target: f32) {
        self.vel_ramp_target = vel_ramp_target;
        debug!(vel_ramp_target, "velocity ramp target");
    }

    /// Switch mode without touching setpoints.
    pub fn set_control_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
        debug!(?mode, "control mode");
    }

    /// Plan a trajectory from the current setpoints to `goal_point` and
    /// enter trajectory mode.
    pub fn move_to_pos<A: AxisHandle>(&mut self, axis: &mut A, goal_point: f32) {
        let limits = *axis.planner().limits();
        let duration = axis.planner_mut().plan(
            goal_point,
            self.setpoints.pos,
            self.setpoints.vel,
            limits.vel_limit,
            limits.accel_limit,
            limits.decel_limit,
        );
        self.traj_start_loop_count = axis.loop_counter();
        self.mode = ControlMode::Trajectory;
        self.goal_point = goal_point;
        debug!(goal_point, duration, start = self.traj_start_loop_count, "trajectory control");
    }

    /// Relative move from the last goal or from the current position setpoint.
    pub fn move_incremental<A: AxisHandle>(&mut self, axis: &mut A, displacement: f32, from_goal_point: bool) {
        let base = if from_goal_point {
            self.goal_point
        } else {
            self.setpoints.pos
        };
        self.move_to_pos(axis, base + displacement);
    }

    // ─── Per-Cycle Update ───────────────────────────────────────────

    /// Run one control cycle.
    ///
    /// # Returns
    /// `Some(current_setpoint)` [A], or `None` when an overspeed fault was
    /// raised; the caller must not apply the output in that case.
    ///
    /// Inputs and setpoints are not checked for finiteness. A NaN estimate
    /// or setpoint propagates to the output unclamped, so the caller must
    /// only feed finite values.
    pub fn update<A: AxisHandle>(&mut self, axis: &mut A, pos_estimate: f32, vel_estimate: f32) -> Option<f32> {
        let dt = self.cycle_period;

        // ── Trajectory ──────────────────────────────────────
        if self.mode == ControlMode::Trajectory {
            // Wrapping delta stays correct across counter overflow as long as
            // the move is shorter than half the counter range.
            let elapsed = axis.loop_counter().wrapping_sub(self.traj_start_loop_count);
            let t = elapsed as f32 * dt;
            let planner = axis.planner();
            if t > planner.duration() {
                // Position setpoint already holds the final sample.
                self.mode = ControlMode::Position;
                self.setpoints.hold();
            } else {
                let step = planner.sample(t);
                self.setpoints.follow(&step, planner.limits().a_per_css);
            }
        }

        // ── Velocity ramp ───────────────────────────────────
        if self.mode == ControlMode::Velocity && self.config.vel_ramp_enable {
            let max_step = dt * self.config.vel_ramp_rate;
            self.setpoints.ramp_velocity(self.vel_ramp_target, max_step);
        }

        // ── Position loop ───────────────────────────────────
        let mut vel_des = self.setpoints.vel;
        if self.mode >= ControlMode::Position {
            let pos_err = if self.config.setpoints_in_cpr {
                // Circular mode reads the encoder directly, not `pos_estimate`.
                let enc = axis.encoder();
                circular_error(&mut self.setpoints.pos, enc.pos_cpr, enc.cpr as f32)
            } else {
                linear_error(self.setpoints.pos, pos_estimate)
            };
            vel_des = velocity_demand(vel_des, self.config.pos_gain, pos_err);
        }

        // ── Velocity limit / overspeed ──────────────────────
        vel_des = limit_velocity(vel_des, self.config.vel_limit);
        if is_overspeed(vel_estimate, self.config.vel_limit, self.config.vel_limit_tolerance) {
            self.set_error(axis, ControllerError::OVERSPEED);
            return None;
        }

        let gains = VelocityGains {
            vel_gain: self.config.vel_gain,
            vel_integrator_gain: self.config.vel_integrator_gain,
        }
        .scheduled(&axis.motor().kind);

        // ── Current feedforward + anticogging ───────────────
        let mut iq = self.setpoints.current;

        let enc = axis.encoder();
        let pos_ratio = enc.count_in_cpr as f32 / enc.cpr as f32;
        let cog = self.cogmap.lookup(pos_ratio);
        self.cogmap_current = cog.current;
        iq += cog.current;

        // ── Velocity loop ───────────────────────────────────
        let v_err = vel_des - vel_estimate;
        if self.mode >= ControlMode::Velocity {
            iq += gains.vel_gain * v_err;

            let corr_rate = self.config.cogmap_integrator_gain * v_err;
            self.cogmap
                .adapt(&cog, corr_rate * dt, self.config.cogmap_max_current);
            self.correction_power.update(corr_rate);
        }

        iq += self.integrator.current();

        // ── Current limit + anti-windup ─────────────────────
        let out = limit_current(iq, axis.motor().effective_current_limit());
        self.integrator
            .update(self.mode, out.limited, gains.vel_integrator_gain, dt, v_err);

        Some(out.value)
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Active control mode.
    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Position setpoint [counts].
    #[inline]
    pub fn pos_setpoint(&self) -> f32 {
        self.setpoints.pos
    }

    /// Velocity setpoint [counts/s].
    #[inline]
    pub fn vel_setpoint(&self) -> f32 {
        self.setpoints.vel
    }

    /// Current setpoint / feedforward [A].
    #[inline]
    pub fn current_setpoint(&self) -> f32 {
        self.setpoints.current
    }

    #[inline]
    pub fn vel_ramp_target(&self) -> f32 {
        self.vel_ramp_target
    }

    /// Velocity integrator contribution [A].
    #[inline]
    pub fn vel_integrator_current(&self) -> f32 {
        self.integrator.current()
    }

    #[inline]
    pub fn goal_point(&self) -> f32 {
        self.goal_point
    }

    #[inline]
    pub fn traj_start_loop_count(&self) -> u32 {
        self.traj_start_loop_count
    }

    /// Cogging compensation applied in the last cycle [A].
    #[inline]
    pub fn cogmap_current(&self) -> f32 {
        self.cogmap_current
    }

    /// Smoothed squared cogging correction rate.
    #[inline]
    pub fn cogmap_correction_pwr(&self) -> f32 {
        self.correction_power.value()
    }

    /// Learned cogging map.
    #[inline]
    pub fn cogmap(&self) -> &CogMap {
        &self.cogmap
    }

    /// Forget everything the cogging map learned.
    pub fn reset_cogmap(&mut self) {
        self.cogmap.clear();
        self.correction_power = CorrectionPower::default();
    }

    /// Sticky fault set.
    #[inline]
    pub fn error(&self) -> ControllerError {
        self.error
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Runtime gain and limit tuning. `cogmap_size` and `cogmap` are only
    /// read at construction.
    #[inline]
    pub fn config_mut(&mut self) -> &mut ControllerConfig {
        &mut self.config
    }

    #[inline]
    pub fn cycle_period(&self) -> f32 {
        self.cycle_period
    }
}
