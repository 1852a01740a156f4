//! Merging user overrides over the defaults

use thiserror::Error;
use tracing::{debug, warn};

use crate::key::ParameterKey;
use crate::set::ParameterSet;
use crate::value::{ParameterOverrides, ParameterValue};

/// Minimum ratio of analysis-window duration to frame shift.
pub const MIN_FRAME_SHIFT_RATIO: f64 = 2.5;

/// The estimator sizes its analysis window as this many periods of the floor.
pub const PERIODS_PER_WINDOW: f64 = 3.0;

/// A rejected override. Rejections are never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterWarning {
    #[error("Ignoring invalid parameter '{key}'")]
    UnknownKey { key: String },

    #[error("Ignoring invalid value {value} for parameter '{key}': expected {expected}")]
    InvalidValue {
        key: ParameterKey,
        value: ParameterValue,
        expected: &'static str,
    },
}

/// Outcome of [`resolve_detailed`]
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Fully populated parameters, floor already reconciled
    pub parameters: ParameterSet,
    /// Overrides that were dropped, in the order they were seen
    pub warnings: Vec<ParameterWarning>,
    /// Pitch floor after merging, before reconciliation
    pub requested_floor: f64,
}

impl Resolution {
    /// `(floor, ceiling)` as the caller asked for them.
    ///
    /// The reconciled floor handed to the estimator can sit below the
    /// requested one, so this is the range to enforce on the output.
    pub fn requested_range(&self) -> (f64, f64) {
        (self.requested_floor, self.parameters.pitch_ceiling)
    }
}

/// Pitch floor to hand to the estimator so that its window is at least
/// [`MIN_FRAME_SHIFT_RATIO`] frame shifts long.
///
/// The window implied by `requested_floor` is widened when it is shorter than
/// `time_step * MIN_FRAME_SHIFT_RATIO`, and the floor matching the widened
/// window is returned. With `time_step == 0` (automatic) the floor comes back
/// unchanged.
pub fn reconcile_floor(requested_floor: f64, time_step: f64) -> f64 {
    let frame_shift = time_step;
    let frame_size =
        (PERIODS_PER_WINDOW / requested_floor).max(frame_shift * MIN_FRAME_SHIFT_RATIO);
    PERIODS_PER_WINDOW / frame_size
}

/// Merge `overrides` over the defaults and reconcile the pitch floor.
///
/// Unknown keys and badly-typed values are logged and ignored.
pub fn resolve(overrides: Option<&ParameterOverrides>) -> ParameterSet {
    resolve_detailed(overrides).parameters
}

/// Like [`resolve`], also returning the warnings that were logged.
pub fn resolve_detailed(overrides: Option<&ParameterOverrides>) -> Resolution {
    let mut parameters = ParameterSet::default();
    let mut warnings = Vec::new();

    for (name, value) in overrides.into_iter().flat_map(|o| o.iter()) {
        let outcome = match ParameterKey::from_name(name) {
            Some(key) => parameters.assign(key, value),
            None => Err(ParameterWarning::UnknownKey {
                key: name.to_string(),
            }),
        };

        if let Err(warning) = outcome {
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    let requested = parameters.pitch_floor;
    parameters.pitch_floor = reconcile_floor(requested, parameters.time_step);
    if parameters.pitch_floor != requested {
        debug!(
            "Pitch floor adjusted from {} Hz to {} Hz for time step {} s",
            requested, parameters.pitch_floor, parameters.time_step
        );
    }

    Resolution {
        parameters,
        warnings,
        requested_floor: requested,
    }
}
