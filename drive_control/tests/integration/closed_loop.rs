//! Trajectory and velocity tracking against the rigid-rotor plant.

use drive_common::controller::config::TrajectoryConfig;
use drive_common::controller::state::ControlMode;
use drive_control::config::{SimConfig, build_axis, build_plant};

use super::cycle;

/// Planner limits with acceleration feedforward matched to the default
/// plant (inertia / torque constant).
fn tracking_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.drive.trajectory = TrajectoryConfig {
        vel_limit: 4000.0,
        accel_limit: 20_000.0,
        decel_limit: 20_000.0,
        a_per_css: config.plant.inertia / config.plant.torque_constant,
    };
    config
}

#[test]
fn trapezoidal_move_settles_on_target() {
    let config = tracking_config();
    let dt = config.drive.cycle_period();
    let mut axis = build_axis(&config.drive).unwrap();
    let mut plant = build_plant(&config);

    axis.move_to_pos(2000.0);
    assert_eq!(axis.controller.mode(), ControlMode::Trajectory);

    let mut max_tracking_error = 0.0_f32;
    let mut peak_current = 0.0_f32;
    // 0.7 s move + 1 s settling
    for _ in 0..13_600 {
        let current = cycle(&mut axis, &mut plant, dt).expect("no fault during move");
        peak_current = peak_current.max(current.abs());
        max_tracking_error =
            max_tracking_error.max((axis.controller.pos_setpoint() - plant.position()).abs());
    }

    assert_eq!(axis.controller.mode(), ControlMode::Position);
    assert_eq!(axis.controller.vel_setpoint(), 0.0);
    assert!(
        (plant.position() - 2000.0).abs() < 1.0,
        "final position {}",
        plant.position()
    );
    assert!(max_tracking_error < 10.0, "tracking error {max_tracking_error}");
    assert!(peak_current <= config.drive.motor.current_lim);
    assert!(axis.error().is_empty());
}

#[test]
fn retarget_mid_move_keeps_velocity_continuous() {
    let config = tracking_config();
    let dt = config.drive.cycle_period();
    let mut axis = build_axis(&config.drive).unwrap();
    let mut plant = build_plant(&config);

    axis.move_to_pos(2000.0);
    for _ in 0..2400 {
        cycle(&mut axis, &mut plant, dt);
    }
    let vel_before = axis.controller.vel_setpoint();
    assert!(vel_before > 1000.0);

    axis.move_to_pos(0.0);
    cycle(&mut axis, &mut plant, dt);
    assert_eq!(axis.controller.vel_setpoint(), vel_before);

    for _ in 0..16_000 {
        cycle(&mut axis, &mut plant, dt);
    }
    assert_eq!(axis.controller.mode(), ControlMode::Position);
    assert!(plant.position().abs() < 1.0, "final position {}", plant.position());
}

#[test]
fn incremental_moves_accumulate_from_goal() {
    let config = tracking_config();
    let dt = config.drive.cycle_period();
    let mut axis = build_axis(&config.drive).unwrap();
    let mut plant = build_plant(&config);

    axis.move_incremental(500.0, true);
    axis.move_incremental(500.0, true);
    assert_eq!(axis.controller.goal_point(), 1000.0);

    for _ in 0..12_000 {
        cycle(&mut axis, &mut plant, dt);
    }
    assert!((plant.position() - 1000.0).abs() < 1.0);
}

#[test]
fn velocity_ramp_reaches_target_speed() {
    let mut config = SimConfig::default();
    config.drive.controller.vel_ramp_enable = true;
    config.drive.controller.vel_ramp_rate = 10_000.0;
    let dt = config.drive.cycle_period();
    let mut axis = build_axis(&config.drive).unwrap();
    let mut plant = build_plant(&config);

    axis.controller.set_vel_setpoint(0.0, 0.0);
    axis.controller.set_vel_ramp_target(2000.0);

    // 0.2 s ramp + 3 s settling
    for _ in 0..25_600 {
        cycle(&mut axis, &mut plant, dt).expect("no fault");
    }
    assert_eq!(axis.controller.vel_setpoint(), 2000.0);
    assert!(
        (plant.velocity() - 2000.0).abs() < 40.0,
        "velocity {}",
        plant.velocity()
    );
}
