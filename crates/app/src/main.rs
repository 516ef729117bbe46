use std::env;

use log::{debug, info, LevelFilter};
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};
use swerve_app::{CommandSlot, DriverInput, SimConfig, SwerveSimulation};

const TICK_DT: f64 = 1.0 / 60.0;

/// Scripted operator input: (duration in seconds, stick x, stick y, rotation).
const SCRIPT: [(f64, f64, f64, f64); 5] = [
    (1.0, 0.0, 1.0, 0.0),   // forward
    (2.0, -0.7, 0.0, 0.5),  // strafe left while turning CCW
    (1.0, 0.0, -1.0, 0.0),  // back up
    (1.5, 0.5, 0.5, -1.0),  // diagonal, turning CW
    (0.5, 0.0, 0.0, 0.0),   // stop
];

fn init_logging(level: LevelFilter) {
    if TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        let _ = SimpleLogger::init(level, Config::default());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match env::args().nth(1) {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    init_logging(config.level_filter());

    let simulation = SwerveSimulation::from_config(&config)?;
    let mut state = simulation.initial_state();
    let commands = CommandSlot::default();

    let geometry = simulation.geometry();
    let integrator = simulation.integrator();
    let bounds = integrator.bounds();
    info!(
        "robot {}x{} on a ±{}×±{} field, max dt {}s, {:?}, {} segments",
        geometry.width(),
        geometry.length(),
        bounds.x,
        bounds.y,
        integrator.max_dt(),
        config.drive_mode,
        SCRIPT.len()
    );

    for (duration, stick_x, stick_y, rotation) in SCRIPT {
        let input = DriverInput::new(stick_x, stick_y, rotation);
        commands.publish(input.to_command(&config.limits, config.drive_mode));

        let ticks = (duration / TICK_DT).round() as usize;
        for _ in 0..ticks {
            let command = commands.snapshot();
            let report = simulation.step(&command, TICK_DT, &mut state)?;
            if let Some(point) = report.trail_append {
                debug!("trail ({:.1}, {:.1})", point.x, point.y);
            }
        }
        info!(
            "after {:.1}s: pose ({:.1}, {:.1}, {:.1}°), trail {}",
            state.elapsed,
            state.pose.x,
            state.pose.y,
            state.pose.heading,
            state.trail.len()
        );
    }

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
