//! # Drive Control Simulator
//!
//! Runs the cascade controller in closed loop against the rigid-rotor plant
//! model: loads a TOML configuration (built-in defaults when omitted),
//! commands a trapezoidal move and reports tracking error, peak current,
//! cogging learning activity and fault state.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use drive_control::config::{SimConfig, build_axis, build_plant, load_config};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Drive Control: closed-loop cascade controller simulation
#[derive(Parser, Debug)]
#[command(name = "drive_control")]
#[command(version)]
#[command(about = "Simulate a trajectory move through the cascaded drive controller")]
struct Args {
    /// Path to the configuration TOML. Built-in defaults when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Move target [counts].
    #[arg(long, default_value_t = 10_000.0, allow_negative_numbers = true)]
    target: f32,

    /// Number of control cycles to simulate.
    #[arg(long, default_value_t = 40_000)]
    cycles: u32,

    /// Print the resolved configuration as TOML and exit.
    #[arg(long)]
    dump_config: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path),
        None => Ok(SimConfig::default()),
    };

    let default_level = config
        .as_ref()
        .map(|c| c.drive.shared.log_level.as_directive())
        .unwrap_or("info");
    setup_tracing(&args, default_level);

    info!("Drive Control v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.dump_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let service = config.drive.shared.service_name.clone();
    let dt = config.drive.cycle_period();
    info!(
        service = %service,
        cycle_time_us = config.drive.cycle_time_us,
        cpr = config.drive.encoder.cpr,
        "config OK"
    );

    let mut axis = build_axis(&config.drive)?;
    let mut plant = build_plant(&config);

    axis.peripherals.encoder = plant.encoder_state();
    axis.move_to_pos(args.target);

    let mut peak_current = 0.0_f32;
    let mut faulted_at = None;
    for cycle in 0..args.cycles {
        axis.peripherals.encoder = plant.encoder_state();
        match axis.step(plant.position(), plant.velocity()) {
            Some(current) => {
                peak_current = peak_current.max(current.abs());
                plant.step(current, dt);
            }
            None => {
                faulted_at = Some(cycle);
                break;
            }
        }
    }

    let position_error = args.target - plant.position();
    info!(
        service = %service,
        target = args.target,
        position = plant.position(),
        position_error,
        peak_current,
        cogmap_correction_rms = axis.controller.cogmap_correction_pwr().sqrt(),
        mode = ?axis.controller.mode(),
        "simulation finished"
    );

    if let Some(cycle) = faulted_at {
        warn!(
            cycle,
            axis_error = ?axis.error(),
            controller_error = ?axis.controller.error(),
            "axis faulted, output disabled"
        );
    }

    Ok(())
}

fn setup_tracing(args: &Args, default_level: &str) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
