//! Command-line arguments

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use pitchtrace_params::ParameterOverrides;

use crate::output::Format;

/// Dense F0 contours from Praat's autocorrelation pitch tracker
#[derive(Debug, Parser)]
#[command(name = "pitchtrace", version, about)]
pub struct Cli {
    /// Config file (default: <config dir>/pitchtrace/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a dense pitch contour from a mono WAV file
    Analyze(AnalyzeArgs),

    /// Print the effective analysis parameters as TOML
    Params(ParamArgs),

    /// Show the configuration, or write a default config file
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Mono, uncompressed WAV file
    pub audio: PathBuf,

    #[command(flatten)]
    pub params: ParamArgs,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Write here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Mark pitch outside the requested floor/ceiling as missing
    #[arg(long)]
    pub mask_out_of_range: bool,
}

/// Parameter flags, layered over the config file's `[parameters]` table
#[derive(Debug, Default, Args)]
pub struct ParamArgs {
    /// Contour rate in Hz (sets time_step = 1 / rate)
    #[arg(long, value_name = "HZ", conflicts_with = "time_step")]
    pub rate: Option<f64>,

    /// Frame shift in seconds (0 = automatic)
    #[arg(long, value_name = "SECONDS")]
    pub time_step: Option<f64>,

    /// Pitch floor in Hz
    #[arg(long, value_name = "HZ")]
    pub floor: Option<f64>,

    /// Pitch ceiling in Hz
    #[arg(long, value_name = "HZ")]
    pub ceiling: Option<f64>,

    /// Any parameter as KEY=VALUE, applied after the flags above
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,
}

impl ParamArgs {
    /// `base` followed by the overrides given on the command line.
    pub fn overrides(&self, base: &ParameterOverrides) -> Result<ParameterOverrides> {
        let mut overrides = base.clone();

        if let Some(rate) = self.rate {
            if !(rate.is_finite() && rate > 0.0) {
                bail!("--rate must be a positive number of Hz, got {}", rate);
            }
            overrides.insert("time_step", 1.0 / rate);
        }
        if let Some(step) = self.time_step {
            overrides.insert("time_step", step);
        }
        if let Some(floor) = self.floor {
            overrides.insert("pitch_floor", floor);
        }
        if let Some(ceiling) = self.ceiling {
            overrides.insert("pitch_ceiling", ceiling);
        }

        for assignment in &self.assignments {
            let (key, value) = ParameterOverrides::parse_assignment(assignment)
                .with_context(|| format!("Bad --set argument '{}'", assignment))?;
            overrides.insert(key, value);
        }

        Ok(overrides)
    }
}
