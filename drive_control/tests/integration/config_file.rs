//! Configuration files end to end: write, load, validate, build.

use std::io::Write;

use drive_common::config::{ConfigError, ConfigLoader};
use drive_common::controller::config::{DriveConfig, MotorType};
use drive_common::controller::state::ControlMode;
use drive_control::config::{SimConfig, build_axis, load_config};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn serialized_defaults_load_back() {
    let original = SimConfig::default();
    let file = write_config(&toml::to_string(&original).unwrap());

    let loaded = load_config(file.path()).unwrap();
    assert_eq!(loaded.drive.cycle_time_us, original.drive.cycle_time_us);
    assert_eq!(loaded.drive.controller.pos_gain, original.drive.controller.pos_gain);
    assert_eq!(loaded.drive.trajectory, original.drive.trajectory);
    assert_eq!(loaded.plant, original.plant);
}

#[test]
fn induction_axis_from_file() {
    let file = write_config(
        r#"
[shared]
service_name = "spindle"
log_level = "debug"

[controller]
control_mode = "velocity"
vel_gain = 0.01
cogmap_size = 4
cogmap = [0.0, 0.0, 0.0, 0.0]

[motor]
kind = "induction"
current_lim = 30.0
acim_gain_min_flux = 2.0
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.drive.shared.service_name, "spindle");
    assert_eq!(config.drive.motor.kind, MotorType::Induction);

    let mut axis = build_axis(&config.drive).unwrap();
    assert_eq!(axis.controller.mode(), ControlMode::Velocity);
    assert_eq!(axis.controller.cogmap().len(), 4);
    assert!(axis.peripherals.motor.kind.is_induction());

    // flux estimate still zero → gains divided by the 2.0 floor
    axis.controller.set_vel_setpoint(100.0, 0.0);
    let out = axis.step(0.0, 0.0).unwrap();
    assert!((out - 0.5).abs() < 1e-5);
}

#[test]
fn mismatched_cogmap_length_is_rejected() {
    let file = write_config(
        r#"
[controller]
cogmap_size = 8
cogmap = [0.0, 0.0, 0.0, 0.0]
"#,
    );
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn out_of_range_cycle_time_is_rejected() {
    let file = write_config("cycle_time_us = 10\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("cycle_time_us"));
}

#[test]
fn missing_file_reports_not_found() {
    let result = DriveConfig::load(std::path::Path::new("/nonexistent/drive.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound)));
}

#[test]
fn defaults_build_without_file() {
    let axis = build_axis(&DriveConfig::default()).unwrap();
    assert_eq!(axis.controller.mode(), ControlMode::Position);
}
