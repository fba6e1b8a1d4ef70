mod report;

use std::error::Error;
use std::path::Path;

use crackx::{
    integrate_life, read_log, GenerationConfig, NormalLoadSampler, ParisLaw, SampleDriver,
    Stations,
};
use report::{render_life, render_summary};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crackx=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("life") => life(&args[1..]),
        Some(path) => generate(Some(Path::new(path))),
        None => generate(None),
    }
}

/// Grow every configured sample and print the tally.
fn generate(config_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => GenerationConfig::from_file(path)?,
        None => GenerationConfig::default(),
    };

    let loading = &config.loading;
    let loads = match loading.seed {
        Some(seed) => NormalLoadSampler::seeded(loading.tensile, loading.shear, seed)?,
        None => NormalLoadSampler::from_entropy(loading.tensile, loading.shear)?,
    };
    let engine = config.engine.clone();

    let mut driver = SampleDriver::new(config, engine, loads)?;
    let summary = driver.run()?;
    println!("{}", render_summary(&summary));
    Ok(())
}

/// Usage of the `life` subcommand.
const LIFE_USAGE: &str = "usage: crackx life <result.txt> [x_start x_end stations]";

/// Integrate fatigue life over one sample log: `life <log> [x_start x_end stations]`.
fn life(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (log, stations) = life_args(args)?;
    let records = read_log(Path::new(log))?;
    let segments = integrate_life(&records, ParisLaw::default(), stations)?;
    print!("{}", render_life(&segments));
    Ok(())
}

/// Split `life` arguments into the log path and the stations.
///
/// Stations are either all given or all defaulted.
fn life_args(args: &[String]) -> Result<(&str, Stations), Box<dyn Error>> {
    match args {
        [log] => Ok((log.as_str(), Stations::default())),
        [log, x_start, x_end, count] => Ok((
            log.as_str(),
            Stations {
                x_start: x_start.parse()?,
                x_end: x_end.parse()?,
                count: count.parse()?,
            },
        )),
        _ => Err(LIFE_USAGE.into()),
    }
}
