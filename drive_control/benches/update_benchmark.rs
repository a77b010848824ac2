//! Per-cycle update benchmark.
//!
//! Measures `Controller::update` in each control mode, with and without
//! cogging adaptation, plus one full closed-loop simulation step. At the
//! default 8 kHz cycle the whole update must fit well inside 125 µs.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use drive_common::controller::config::{ControllerConfig, DriveConfig};
use drive_common::controller::state::ControlMode;
use drive_control::axis::AxisPeripherals;
use drive_control::config::{SimConfig, build_axis, build_plant};
use drive_control::control::Controller;

const DT: f32 = 125e-6;

fn reference_config() -> ControllerConfig {
    ControllerConfig {
        cogmap_integrator_gain: 0.5,
        ..Default::default()
    }
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller_update");
    for mode in [
        ControlMode::Current,
        ControlMode::Velocity,
        ControlMode::Position,
        ControlMode::Trajectory,
    ] {
        let mut ctrl = Controller::new(reference_config(), DT).expect("reference config");
        let mut axis = AxisPeripherals::from_config(&DriveConfig::default());
        match mode {
            ControlMode::Current => ctrl.set_current_setpoint(1.0),
            ControlMode::Velocity => ctrl.set_vel_setpoint(1000.0, 0.0),
            ControlMode::Position => ctrl.set_pos_setpoint(5000.0, 0.0, 0.0),
            ControlMode::Trajectory => ctrl.move_to_pos(&mut axis, 1.0e6),
        }

        let mut cycle = 0u32;
        group.bench_with_input(BenchmarkId::from_parameter(format!("{mode:?}")), &mode, |b, _| {
            b.iter(|| {
                cycle = cycle.wrapping_add(1);
                axis.loop_counter = cycle;
                axis.encoder.count_in_cpr = (cycle % 8192) as i32;
                axis.encoder.pos_cpr = axis.encoder.count_in_cpr as f32;
                ctrl.update(&mut axis, cycle as f32, 900.0)
            });
        });
    }
    group.finish();
}

fn bench_closed_loop(c: &mut Criterion) {
    let config = SimConfig::default();
    let mut axis = build_axis(&config.drive).expect("default config");
    let mut plant = build_plant(&config);
    axis.move_to_pos(1.0e6);

    c.bench_function("closed_loop_step", |b| {
        b.iter(|| {
            axis.peripherals.encoder = plant.encoder_state();
            let current = axis.step(plant.position(), plant.velocity()).unwrap_or(0.0);
            plant.step(current, DT);
        });
    });
}

criterion_group!(benches, bench_modes, bench_closed_loop);
criterion_main!(benches);
