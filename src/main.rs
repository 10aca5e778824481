use octsim::{bench_accel, LogDiagnostics, RunConfig, Simulation, VtkWriter};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Run configuration YAML file
    #[arg(short, long, default_value = "run.yaml")]
    file: PathBuf,

    /// Run the direct-vs-tree scaling benchmark instead of a simulation
    #[arg(long)]
    bench: bool,
}

fn load_config(path: &PathBuf) -> Result<RunConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let cfg: RunConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_accel();
        return Ok(());
    }

    let cfg = load_config(&args.file)?;
    cfg.validate().context("invalid run configuration")?;

    log::info!(
        "starting run: n = {}, frames = {}, dt = {}, theta = {}",
        cfg.n,
        cfg.frames,
        cfg.dt,
        cfg.theta
    );

    let mut diag = LogDiagnostics;
    let mut sink = VtkWriter::new(&cfg.output_dir)
        .with_context(|| format!("creating output directory {}", cfg.output_dir.display()))?;

    let mut sim = Simulation::init(cfg.to_parameters(), &mut diag);
    sim.run(&mut sink, &mut diag)?;

    Ok(())
}
