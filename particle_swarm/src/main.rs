//! particle_swarm — interactive entry point.
//!
//! ```text
//! particle_swarm [--config FILE] [--stdin | --detector PROGRAM [ARGS...]] [--dump-config]
//! ```

use std::path::PathBuf;

use particle_swarm::{run, DetectorChoice, SwarmConfig, SwarmError};

const USAGE: &str = "\
usage: particle_swarm [--config FILE] [--stdin | --detector PROGRAM [ARGS...]] [--dump-config]

  --config FILE       JSON settings; missing keys keep their defaults
  --stdin             read estimator results (JSON lines) from stdin
  --detector PROG ..  spawn PROG and read its stdout; remaining args go to PROG
  --dump-config       print the effective settings as JSON and exit

Without a detector the window's mouse and keys 0-4 / H drive a simulated hand.
Set RUST_LOG=debug for per-detection logging.";

#[derive(Debug, Default)]
struct Args {
    config:      Option<PathBuf>,
    detector:    DetectorChoice,
    dump_config: bool,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Option<Args>, String> {
    let mut args = Args::default();
    while let Some(a) = it.next() {
        match a.as_str() {
            "-h" | "--help"  => return Ok(None),
            "--config"       => {
                let path = it.next().ok_or("--config needs a file")?;
                args.config = Some(PathBuf::from(path));
            }
            "--stdin"        => args.detector = DetectorChoice::Stdin,
            "--detector"     => {
                let program = it.next().ok_or("--detector needs a program")?;
                args.detector = DetectorChoice::Command { program, args: it.by_ref().collect() };
            }
            "--dump-config"  => args.dump_config = true,
            other            => return Err(format!("unknown argument `{}`", other)),
        }
    }
    Ok(Some(args))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(a)) => a,
        Ok(None)    => { println!("{}", USAGE); return; }
        Err(msg)    => {
            eprintln!("{}\n\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = start(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn start(args: Args) -> Result<(), SwarmError> {
    let cfg = match &args.config {
        Some(path) => SwarmConfig::load(path)?,
        None       => SwarmConfig::default(),
    };

    if args.dump_config {
        let text = serde_json::to_string_pretty(&cfg).map_err(std::io::Error::from)?;
        println!("{}", text);
        return Ok(());
    }

    log::info!(
        "{}x{} canvas, {} particles, detector: {:?}",
        cfg.width, cfg.height, cfg.population, args.detector
    );
    run(cfg, args.detector)
}
