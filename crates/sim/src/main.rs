mod config;
mod report;
mod scenario;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use stride::{ActorSetup, Orientation, Simulation, TestCourse};

use config::ConfigFile;
use report::RunReport;
use scenario::Scenario;

const CAPSULE_RADIUS: f32 = 0.4;

#[derive(Parser)]
#[command(name = "stride-sim")]
#[command(about = "Runs scripted locomotion scenarios on the test course")]
struct Args {
    #[arg(long, help = "TOML file with [stats] and [sim] tables")]
    stats: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Scenario::Stroll)]
    scenario: Scenario,

    #[arg(long, help = "Run length in seconds, defaults to the scenario length")]
    seconds: Option<f32>,

    #[arg(long, help = "Render frames per second")]
    frame_rate: Option<u32>,

    #[arg(long, help = "Physics steps per second")]
    tick_rate: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut file = match &args.stats {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    if let Some(frame_rate) = args.frame_rate {
        file.sim.frame_rate = frame_rate;
    }
    if let Some(tick_rate) = args.tick_rate {
        file.sim.tick_rate = tick_rate;
    }
    if args.seconds.is_some() {
        file.sim.seconds = args.seconds;
    }
    if file.sim.frame_rate == 0 || file.sim.tick_rate == 0 {
        bail!("frame and tick rates must be positive");
    }

    run(args.scenario, &file)
}

fn run(scenario: Scenario, file: &ConfigFile) -> Result<()> {
    let mut sim = Simulation::new(file.sim.tick_rate);
    let course = TestCourse::new();
    course.spawn(sim.physics_mut());

    let stats = file.stats.clone();
    let script = scenario.script();
    let seconds = file.sim.seconds.unwrap_or_else(|| script.duration());

    let position = course.spawn_point(scenario.start(), stats.player_height * stats.start_y_scale);
    let body = sim.physics_mut().add_character(
        position,
        stats.player_height,
        CAPSULE_RADIUS,
        stats.start_y_scale,
    );
    let id = sim.spawn_actor(
        ActorSetup::new(stats)
            .with_body(body)
            .with_input(script)
            .with_orientation(Orientation::from_yaw(scenario.yaw_at(0.0))),
    );
    if let Some(err) = sim.setup_error(id) {
        bail!("{id} could not be set up: {err}");
    }

    log::info!(
        "{}: {seconds:.2} s at {} fps, {} Hz physics",
        scenario.name(),
        file.sim.frame_rate,
        file.sim.tick_rate
    );

    let dt = 1.0 / file.sim.frame_rate as f32;
    let frames = (seconds / dt).ceil() as u32;
    let mut report = RunReport::new();

    for frame in 0..frames {
        let time = frame as f32 * dt;
        sim.set_yaw(id, scenario.yaw_at(time));
        sim.frame(dt);

        for (_, event) in sim.drain_events() {
            report.record_event(time, event);
        }

        let Some(readout) = sim.readout(id) else {
            log::warn!("{id} stopped at t={time:.2}s");
            break;
        };
        let Some(position) = sim
            .body_handle(id)
            .and_then(|handle| sim.physics().body_position(handle))
        else {
            break;
        };
        report.record_frame(position, readout);
    }

    report.log_summary(scenario.name());
    Ok(())
}
