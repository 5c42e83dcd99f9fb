use lbm_wake::conditions::*;
use lbm_wake::{SimConfig, Simulation, Steppable};
use log::{error, info};
use std::time::Instant;

mod snapshot;
mod visualization;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> lbm_wake::Result<()> {
    let mut sim = Simulation::new(SimConfig::default())?;
    let start = Instant::now();

    if HEADLESS {
        sim.run(HEADLESS_STEPS)?;
        snapshot::save_vorticity(&sim, SNAPSHOT_PATH, SNAPSHOT_PIXELS)?;
        info!("Snapshot written to {}", SNAPSHOT_PATH);
    } else {
        visualization::run_simulation(&mut sim)?;
    }

    info!(
        "{} ticks in {:?}, total density {:.6}",
        sim.tick(),
        start.elapsed(),
        sim.total_density()
    );
    Ok(())
}
