use nbody_replay::{discover_snapshot_files, load_snapshots, run_replay};

use anyhow::Result;
use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Animate the recorded time evolution of an N-body run from CSV snapshots")]
struct Args {
    /// Directory containing the snapshot files
    #[arg(short, long, default_value = "output")]
    input: PathBuf,

    /// Filename prefix of the snapshot files
    #[arg(short = 'p', long = "input-prefix", default_value = "nbody-")]
    input_prefix: String,

    /// Interval between animation steps (ms)
    #[arg(short = 'a', long = "animation-interval", default_value_t = 50)]
    animation_interval: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    log::info!("-- input directory:   {}", args.input.display());
    log::info!("-- input prefix:      {}", args.input_prefix);
    log::info!("-- animation interval: {} ms", args.animation_interval);

    let files = discover_snapshot_files(&args.input, &args.input_prefix)?;
    if files.is_empty() {
        log::info!(
            "no files matching '{}*.csv' found in '{}', nothing to show",
            args.input_prefix,
            args.input.display()
        );
        return Ok(());
    }

    let (snapshots, dim) = load_snapshots(&files)?;
    log::info!("interpreting the given files as a {dim} problem");

    run_replay(snapshots, dim, args.animation_interval)?;
    log::info!("N-body replay ended");

    Ok(())
}
