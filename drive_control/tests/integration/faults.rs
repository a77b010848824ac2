//! Fault propagation from the controller to the axis.

use drive_common::controller::error::{AxisError, ControllerError};
use drive_common::controller::state::ControlMode;
use drive_control::config::{SimConfig, build_axis, build_plant};

use super::cycle;

#[test]
fn overspeed_disables_output_until_cleared() {
    let config = SimConfig::default();
    let dt = config.drive.cycle_period();
    let limit = config.drive.controller.vel_limit * config.drive.controller.vel_limit_tolerance;
    let mut axis = build_axis(&config.drive).unwrap();
    let mut plant = build_plant(&config);

    axis.controller.set_vel_setpoint(0.0, 0.0);
    plant.set_state(0.0, limit * 1.1);
    assert_eq!(cycle(&mut axis, &mut plant, dt), None);
    assert_eq!(axis.error(), AxisError::CONTROLLER_FAILED);
    assert_eq!(axis.controller.error(), ControllerError::OVERSPEED);

    // still too fast: keeps refusing
    assert_eq!(cycle(&mut axis, &mut plant, dt), None);

    plant.set_state(0.0, 0.0);
    assert!(cycle(&mut axis, &mut plant, dt).is_some());
    // faults are sticky
    assert!(!axis.error().is_empty());

    axis.clear_errors();
    assert!(axis.error().is_empty());
    assert!(axis.controller.error().is_empty());
}

#[test]
fn overspeed_check_can_be_disabled() {
    let mut config = SimConfig::default();
    config.drive.controller.vel_limit_tolerance = 0.0;
    let mut axis = build_axis(&config.drive).unwrap();

    axis.controller.set_vel_setpoint(0.0, 0.0);
    let out = axis.step(0.0, 1.0e6);
    // demand saturates at the current limit instead of faulting
    assert_eq!(out, Some(-config.drive.motor.current_lim));
    assert!(axis.error().is_empty());
}

#[test]
fn derated_motor_limits_output() {
    let config = SimConfig::default();
    let mut axis = build_axis(&config.drive).unwrap();
    axis.peripherals.motor.max_allowed_current = 2.0;

    axis.controller.set_current_setpoint(5.0);
    assert_eq!(axis.step(0.0, 0.0), Some(2.0));
    assert_eq!(axis.controller.mode(), ControlMode::Current);
    assert_eq!(axis.controller.vel_integrator_current(), 0.0);
}
