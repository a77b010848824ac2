//! Closed-loop test scenarios.

mod closed_loop;
mod cogging;
mod config_file;
mod faults;

use drive_control::axis::Axis;
use drive_control::sim::PlantModel;

/// One closed-loop cycle: encoder → controller → plant.
///
/// Returns the applied current, or `None` if the controller faulted (the
/// plant then coasts with zero current).
pub fn cycle(axis: &mut Axis, plant: &mut PlantModel, dt: f32) -> Option<f32> {
    axis.peripherals.encoder = plant.encoder_state();
    let out = axis.step(plant.position(), plant.velocity());
    plant.step(out.unwrap_or(0.0), dt);
    out
}
