//! Sparse pitch estimates as returned by the external estimator

use std::path::Path;

use serde::Serialize;

use crate::error::{CollaboratorError, ContourError, Result};

/// One voiced frame: centre time in seconds and pitch in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatePoint {
    pub time: f64,
    pub pitch: f64,
}

/// Voiced frames in strictly increasing time order.
///
/// Unvoiced frames are simply absent, so spacing is irregular wherever the
/// estimator found no pitch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SparseEstimate {
    points: Vec<EstimatePoint>,
}

impl SparseEstimate {
    /// Build from points, checking that every value is finite and that
    /// times strictly increase.
    pub fn new(points: Vec<EstimatePoint>) -> std::result::Result<Self, CollaboratorError> {
        for (i, point) in points.iter().enumerate() {
            check_point(i + 1, point, i.checked_sub(1).map(|p| points[p].time))?;
        }
        Ok(Self { points })
    }

    /// Build from `(time, pitch)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> std::result::Result<Self, CollaboratorError> {
        Self::new(
            pairs
                .iter()
                .map(|&(time, pitch)| EstimatePoint { time, pitch })
                .collect(),
        )
    }

    /// Parse the estimator's two-column text output.
    ///
    /// Columns are whitespace separated. Blank lines and lines starting with
    /// `#` are skipped. Line numbers in errors are 1-based.
    pub fn parse(text: &str) -> std::result::Result<Self, CollaboratorError> {
        let mut points: Vec<EstimatePoint> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 2 {
                return Err(CollaboratorError::malformed(
                    line_no,
                    format!("expected 2 columns, found {}", fields.len()),
                ));
            }

            let number = |field: &str| {
                field.parse::<f64>().map_err(|_| {
                    CollaboratorError::malformed(line_no, format!("'{}' is not a number", field))
                })
            };
            let point = EstimatePoint {
                time: number(fields[0])?,
                pitch: number(fields[1])?,
            };

            check_point(line_no, &point, points.last().map(|p| p.time))?;
            points.push(point);
        }

        Ok(Self { points })
    }

    /// Read and parse an output file written by the estimator.
    pub fn read<P: AsRef<Path>>(path: P) -> std::result::Result<Self, CollaboratorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            CollaboratorError::MissingOutput {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::parse(&text)
    }

    pub fn points(&self) -> &[EstimatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest gap between consecutive timestamps, if there are at least two.
    pub fn min_spacing(&self) -> Option<f64> {
        self.points
            .windows(2)
            .map(|pair| pair[1].time - pair[0].time)
            .reduce(f64::min)
    }

    /// Frame rate of the estimate, `round(1 / min_spacing)`.
    ///
    /// The smallest gap reflects the nominal frame shift even when unvoiced
    /// stretches leave larger holes.
    pub fn infer_rate(&self) -> Result<u32> {
        if self.is_empty() {
            return Err(ContourError::EmptyEstimate);
        }

        let unresolvable = ContourError::UnresolvableRate {
            samples: self.len(),
        };
        let spacing = match self.min_spacing() {
            Some(spacing) => spacing,
            None => return Err(unresolvable),
        };

        let rate = (1.0 / spacing).round_ties_even();
        if !(1.0..=u32::MAX as f64).contains(&rate) {
            return Err(unresolvable);
        }

        Ok(rate as u32)
    }
}

fn check_point(
    line: usize,
    point: &EstimatePoint,
    previous_time: Option<f64>,
) -> std::result::Result<(), CollaboratorError> {
    if !point.time.is_finite() || !point.pitch.is_finite() {
        return Err(CollaboratorError::malformed(line, "non-finite value"));
    }

    if let Some(previous) = previous_time {
        if point.time <= previous {
            return Err(CollaboratorError::malformed(
                line,
                format!(
                    "time {} does not follow previous time {}",
                    point.time, previous
                ),
            ));
        }
    }

    Ok(())
}
