//! Online cogging-map learning against a plant with sinusoidal cogging.

use drive_control::config::{SimConfig, build_axis, build_plant};
use drive_control::sim::PlantParams;

use super::cycle;

const SPEED: f32 = 400.0;
const CPR: u32 = 1024;
const MAP_SIZE: usize = 256;
const CYCLES_PER_REV: usize = 2560;

/// 1 kHz loop, P-only velocity loop so the velocity error mirrors the
/// cogging torque.
fn cogging_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.drive.cycle_time_us = 1000;
    config.drive.encoder.cpr = CPR;
    let ctrl = &mut config.drive.controller;
    ctrl.vel_integrator_gain = 0.0;
    ctrl.cogmap_size = MAP_SIZE;
    ctrl.cogmap_integrator_gain = 0.02;
    ctrl.cogmap_max_current = 0.05;
    config.plant = PlantParams {
        cogging_torque: 0.02,
        cogging_periods: 4,
        ..Default::default()
    };
    config
}

#[test]
fn learned_map_cancels_cogging_ripple() {
    let config = cogging_config();
    assert!(config.validate().is_ok());
    let dt = config.drive.cycle_period();
    let mut axis = build_axis(&config.drive).unwrap();
    let mut plant = build_plant(&config);
    plant.set_state(0.0, SPEED);
    axis.controller.set_vel_setpoint(SPEED, 0.0);

    let mut ripple = Vec::new();
    for _ in 0..6 {
        let mut worst = 0.0_f32;
        for _ in 0..CYCLES_PER_REV {
            cycle(&mut axis, &mut plant, dt).expect("no fault");
            worst = worst.max((plant.velocity() - SPEED).abs());
        }
        ripple.push(worst);
    }

    let first = ripple[0];
    let last = ripple[ripple.len() - 1];
    assert!(first > 20.0, "uncompensated ripple {first}");
    assert!(last < 0.5 * first, "ripple per revolution {ripple:?}");

    let map = axis.controller.cogmap().as_slice();
    assert!(map.iter().all(|v| v.abs() <= 0.05));

    // compensation opposes the plant's cogging torque
    let step = CPR as f32 / MAP_SIZE as f32;
    let correlation: f32 = map
        .iter()
        .enumerate()
        .map(|(k, v)| v * plant.cogging_torque(k as f32 * step))
        .sum();
    assert!(correlation < 0.0, "correlation {correlation}");
    assert!(axis.controller.cogmap_correction_pwr() > 0.0);
}

#[test]
fn zero_gain_leaves_map_untouched() {
    let mut config = cogging_config();
    config.drive.controller.cogmap_integrator_gain = 0.0;
    let dt = config.drive.cycle_period();
    let mut axis = build_axis(&config.drive).unwrap();
    let mut plant = build_plant(&config);
    plant.set_state(0.0, SPEED);
    axis.controller.set_vel_setpoint(SPEED, 0.0);

    for _ in 0..CYCLES_PER_REV {
        cycle(&mut axis, &mut plant, dt);
    }
    assert!(axis.controller.cogmap().as_slice().iter().all(|&v| v == 0.0));
    assert_eq!(axis.controller.cogmap_current(), 0.0);
}

#[test]
fn preloaded_map_is_applied_in_current_mode() {
    let mut config = SimConfig::default();
    config.drive.encoder.cpr = 4;
    config.drive.controller.cogmap_size = 4;
    let mut table = drive_common::controller::config::CogTable::new();
    table.extend_from_slice(&[0.1, 0.2, 0.3, 0.4]).unwrap();
    config.drive.controller.cogmap = Some(table);
    assert!(config.validate().is_ok());

    let mut axis = build_axis(&config.drive).unwrap();
    axis.controller.set_current_setpoint(1.0);
    axis.peripherals.encoder.count_in_cpr = 2;
    let out = axis.step(0.0, 0.0).unwrap();
    assert!((out - 1.3).abs() < 1e-6);
    assert!((axis.controller.cogmap_current() - 0.3).abs() < 1e-6);
}
