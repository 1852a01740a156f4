//! pitchtrace - dense F0 contours from Praat
//!
//! Runs Praat's autocorrelation pitch tracker on a mono WAV file and writes a
//! uniformly sampled contour covering the whole recording, with missing
//! markers where no pitch was found.

mod cli;
mod config;
mod output;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use pitchtrace_contour::{AudioSource, DenseContour, PitchAnalyzer, PitchEstimator};
use pitchtrace_params::{resolve, resolve_detailed, ParameterOverrides};
use tracing::{debug, info, Level};

use crate::cli::{AnalyzeArgs, Cli, Command, ParamArgs};
use crate::config::CliConfig;
use crate::output::write_contour;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the contour
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Analyze(args) => {
            let config = load_config(cli.config.as_deref())?;
            analyze(&config, args)
        }
        Command::Params(args) => {
            let config = load_config(cli.config.as_deref())?;
            print_params(&config, &args)
        }
        Command::Config { init } => show_config(cli.config.as_deref(), init),
    }
}

fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let config = CliConfig::load(path).context("Failed to load configuration")?;
    info!("Configuration loaded from {}", config.config_path.display());
    Ok(config)
}

fn analyze(config: &CliConfig, args: AnalyzeArgs) -> Result<()> {
    let overrides = args.params.overrides(&config.parameters)?;
    let analyzer = PitchAnalyzer::praat(config.praat_config());

    let contour = contour_for(&analyzer, &args.audio, &overrides, args.mask_out_of_range)
        .with_context(|| format!("Failed to analyze {}", args.audio.display()))?;

    info!(
        "{} slots at {} Hz, {} voiced, {} dropped",
        contour.len(),
        contour.rate(),
        contour.voiced_count(),
        contour.dropped()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_contour(&contour, args.format, BufWriter::new(file))?;
            info!("Contour written to {}", path.display());
        }
        None => write_contour(&contour, args.format, io::stdout().lock())?,
    }

    Ok(())
}

/// Analyze `audio`, masking pitch outside the requested floor and ceiling
/// when `mask` is set.
fn contour_for<E: PitchEstimator>(
    analyzer: &PitchAnalyzer<E>,
    audio: &Path,
    overrides: &ParameterOverrides,
    mask: bool,
) -> Result<DenseContour> {
    let audio = AudioSource::load(audio)?;
    let resolution = resolve_detailed(Some(overrides));
    let contour = analyzer.reconstruct(&audio, &resolution.parameters)?;

    if !mask {
        return Ok(contour);
    }
    let (floor, ceiling) = resolution.requested_range();
    debug!("Masking pitch outside {} to {} Hz", floor, ceiling);
    Ok(contour.mask_outside(floor, ceiling))
}

fn print_params(config: &CliConfig, args: &ParamArgs) -> Result<()> {
    let overrides = args.overrides(&config.parameters)?;
    let params = resolve(Some(&overrides));
    print!(
        "{}",
        toml::to_string_pretty(&params).context("Failed to serialize parameters")?
    );
    Ok(())
}

fn show_config(path: Option<&Path>, init: bool) -> Result<()> {
    if init {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => pitchtrace_paths::default_config_path()?,
        };

        if target.exists() {
            println!("Config already exists at {}", target.display());
        } else {
            CliConfig::at(target.clone()).save()?;
            println!("Wrote default config to {}", target.display());
        }
        return Ok(());
    }

    let config = load_config(path)?;
    println!("# {}", config.config_path.display());
    print!(
        "{}",
        toml::to_string_pretty(&config).context("Failed to serialize config")?
    );
    Ok(())
}
