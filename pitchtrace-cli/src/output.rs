//! Contour writers

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use pitchtrace_contour::DenseContour;

/// Output format for `pitchtrace analyze`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// `time,pitch` rows, `NaN` where no pitch was found
    #[default]
    Csv,
    /// The whole contour with its parameters, `null` where no pitch was found
    Json,
}

pub fn write_contour<W: Write>(contour: &DenseContour, format: Format, out: W) -> Result<()> {
    match format {
        Format::Csv => write_csv(contour, out),
        Format::Json => write_json(contour, out),
    }
}

fn write_csv<W: Write>(contour: &DenseContour, mut out: W) -> Result<()> {
    writeln!(out, "time,pitch")?;
    for (time, pitch) in contour.iter() {
        match pitch {
            Some(hz) => writeln!(out, "{},{}", time, hz)?,
            None => writeln!(out, "{},NaN", time)?,
        }
    }
    out.flush().context("Failed to flush CSV output")
}

fn write_json<W: Write>(contour: &DenseContour, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, contour).context("Failed to serialize contour")?;
    writeln!(out)?;
    out.flush().context("Failed to flush JSON output")
}
