//! Dense contour reconstruction
//!
//! A sparse estimate only lists voiced frames. The dense contour has one slot
//! per period of the inferred frame rate, from time zero to the end of the
//! audio, and marks every slot the estimator did not report as missing.
//!
//! Slot assignment uses `floor(time * rate)`. A timestamp written as `i / rate`
//! must land in slot `i`, but binary floating point can leave the product a
//! hair below the integer (`0.29 * 100.0 == 28.999999999999996`). Products
//! within [`SLOT_SNAP_TOLERANCE`] slots of an integer are snapped to it before
//! flooring.

use pitchtrace_params::ParameterSet;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::estimate::SparseEstimate;

/// Relative distance (in slots) under which a product is treated as integral.
pub const SLOT_SNAP_TOLERANCE: f64 = 1e-9;

/// Rate and length of a dense contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourGrid {
    rate: u32,
    len: usize,
}

/// Result of projecting a sparse estimate onto a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub pitch: Vec<Option<f64>>,
    /// Estimate points whose slot fell outside the grid
    pub dropped: usize,
}

impl ContourGrid {
    pub fn new(rate: u32, len: usize) -> Self {
        Self { rate, len }
    }

    /// Grid covering `duration_secs`: `round(duration * rate)` slots.
    pub fn for_duration(rate: u32, duration_secs: f64) -> Self {
        let len = (duration_secs * rate as f64).round_ties_even().max(0.0) as usize;
        Self { rate, len }
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `i / rate` for every slot
    pub fn time_axis(&self) -> Vec<f64> {
        let rate = self.rate as f64;
        (0..self.len).map(|i| i as f64 / rate).collect()
    }

    /// Slot holding `time`, or `None` when it falls outside the grid.
    pub fn slot(&self, time: f64) -> Option<usize> {
        let slot = floor_snapped(time * self.rate as f64);
        if slot < 0.0 || slot >= self.len as f64 {
            return None;
        }
        Some(slot as usize)
    }

    /// Place every estimate point in its slot. Later points overwrite
    /// earlier ones that share a slot.
    pub fn project(&self, estimate: &SparseEstimate) -> Projection {
        let mut pitch = vec![None; self.len];
        let mut dropped = 0;

        for point in estimate.points() {
            match self.slot(point.time) {
                Some(slot) => pitch[slot] = Some(point.pitch),
                None => {
                    debug!(
                        "Estimate at {} s falls outside the {}-slot grid, dropping it",
                        point.time, self.len
                    );
                    dropped += 1;
                }
            }
        }

        Projection { pitch, dropped }
    }
}

fn floor_snapped(x: f64) -> f64 {
    let nearest = x.round();
    if (x - nearest).abs() <= SLOT_SNAP_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        x.floor()
    }
}

/// Uniformly sampled pitch contour spanning the whole recording.
///
/// `time[i] == i / rate`; `pitch[i]` is `None` where the estimator reported
/// nothing. Pitch values are passed through as estimated, including values
/// outside the floor/ceiling range (see [`DenseContour::mask_outside`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenseContour {
    rate: u32,
    time: Vec<f64>,
    pitch: Vec<Option<f64>>,
    parameters: ParameterSet,
    #[serde(skip)]
    dropped: usize,
}

impl DenseContour {
    /// Rebuild a dense contour for audio lasting `duration_secs`.
    ///
    /// Fails with `EmptyEstimate` when nothing was voiced and with
    /// `UnresolvableRate` when the rate can't be inferred.
    pub fn reconstruct(
        estimate: &SparseEstimate,
        duration_secs: f64,
        parameters: ParameterSet,
    ) -> Result<Self> {
        let rate = estimate.infer_rate()?;
        let grid = ContourGrid::for_duration(rate, duration_secs);
        debug!(
            "Reconstructing {} voiced frames onto {} slots at {} Hz",
            estimate.len(),
            grid.len(),
            rate
        );
        Ok(Self::on_grid(grid, estimate, parameters))
    }

    /// Project `estimate` onto an explicit grid.
    pub fn on_grid(grid: ContourGrid, estimate: &SparseEstimate, parameters: ParameterSet) -> Self {
        let Projection { pitch, dropped } = grid.project(estimate);
        Self {
            rate: grid.rate(),
            time: grid.time_axis(),
            pitch,
            parameters,
            dropped,
        }
    }

    /// Inferred frame rate in Hz
    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn pitch(&self) -> &[Option<f64>] {
        &self.pitch
    }

    /// Parameters the estimator actually ran with
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Number of slots holding a pitch value
    pub fn voiced_count(&self) -> usize {
        self.pitch.iter().filter(|p| p.is_some()).count()
    }

    /// Estimate points that fell outside the grid
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// `(time, pitch)` per slot
    pub fn iter(&self) -> impl Iterator<Item = (f64, Option<f64>)> + '_ {
        self.time.iter().copied().zip(self.pitch.iter().copied())
    }

    /// Copy of the contour with pitch outside `[floor, ceiling]` marked missing.
    ///
    /// Never applied implicitly. The reconciled floor handed to the estimator
    /// can sit below the floor the caller asked for, so callers wanting the
    /// original range enforced pass
    /// `pitchtrace_params::Resolution::requested_range` here.
    pub fn mask_outside(&self, floor: f64, ceiling: f64) -> Self {
        let pitch = self
            .pitch
            .iter()
            .map(|p| p.filter(|hz| (floor..=ceiling).contains(hz)))
            .collect();
        Self {
            pitch,
            ..self.clone()
        }
    }

    /// Split into `(pitch, time, parameters)`.
    pub fn into_parts(self) -> (Vec<Option<f64>>, Vec<f64>, ParameterSet) {
        (self.pitch, self.time, self.parameters)
    }
}
