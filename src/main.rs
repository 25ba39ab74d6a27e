use gravsim::{ScenarioConfig, Simulation};
use gravsim::{bench_acceleration, bench_parallel};

use anyhow::Result;
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "orbital.yaml")]
    file_name: String,

    /// Stop after this many frames (runs until interrupted when omitted)
    #[arg(long)]
    frames: Option<u64>,

    /// Run the timing harnesses instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if args.bench {
        bench_acceleration();
        bench_parallel();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let system = scenario_cfg.engine.system;

    let sim = Simulation::new(scenario_cfg.into_settings())?;
    sim.generate(system);
    sim.set_active(true);

    log::info!(
        "starting: {} bodies, total mass {:.3e}",
        sim.body_count(),
        sim.total_mass()
    );

    let running = AtomicBool::new(true);

    thread::scope(|scope| {
        // Dedicated simulation thread; this thread plays the observer.
        scope.spawn(|| sim.run(&running));

        loop {
            thread::sleep(Duration::from_secs(1));
            log::info!(
                "frame {:5}  fps {:5.1}  bodies {}",
                sim.frames(),
                sim.fps(),
                sim.body_count()
            );
            if let Some(limit) = args.frames {
                if sim.frames() >= limit {
                    running.store(false, Ordering::Relaxed);
                    break;
                }
            }
        }
    });

    Ok(())
}
