//! Configuration bundle loading and axis construction.
//!
//! The demo/simulation file is a [`DriveConfig`] with an extra `[plant]`
//! section:
//!
//! ```toml
//! cycle_time_us = 125
//!
//! [controller]
//! control_mode = "position"
//! cogmap_integrator_gain = 0.5
//!
//! [trajectory]
//! vel_limit = 8000.0
//!
//! [plant]
//! cogging_torque = 0.02
//! ```

use std::path::Path;

use drive_common::config::{ConfigError, ConfigLoader};
use drive_common::controller::config::DriveConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::axis::{Axis, AxisPeripherals};
use crate::control::cogging::CogMapError;
use crate::control::controller::Controller;
use crate::sim::{PlantModel, PlantParams};

// ─── Error Type ─────────────────────────────────────────────────────

/// Failure while turning a configuration into a running axis.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured cogging map could not be built.
    #[error("cogging map: {0}")]
    CogMap(#[from] CogMapError),
}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Drive configuration plus simulated plant parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Axis and controller settings.
    #[serde(flatten)]
    pub drive: DriveConfig,

    /// Simulated rotor.
    #[serde(default)]
    pub plant: PlantParams,
}

impl SimConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.drive.validate()?;
        self.plant.validate().map_err(ConfigError::ValidationError)
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate a simulation configuration file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let config = SimConfig::load(path)?;
    config.validate()?;
    info!(
        path = %path.display(),
        cycle_time_us = config.drive.cycle_time_us,
        mode = ?config.drive.controller.control_mode,
        "configuration loaded"
    );
    Ok(config)
}

/// Build the reference axis described by `config`.
///
/// # Errors
/// `SetupError::CogMap` if the configured cogging map size or table is out
/// of range.
pub fn build_axis(config: &DriveConfig) -> Result<Axis, SetupError> {
    let controller = Controller::new(config.controller.clone(), config.cycle_period())?;
    Ok(Axis::new(controller, AxisPeripherals::from_config(config)))
}

/// Build the simulated plant matching `config`'s encoder.
pub fn build_plant(config: &SimConfig) -> PlantModel {
    PlantModel::new(config.plant, config.drive.encoder.cpr)
}
