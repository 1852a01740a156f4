//! The collaborator seam: anything that turns audio into a sparse estimate

use std::path::Path;

use pitchtrace_params::ParameterSet;

use crate::error::CollaboratorError;
use crate::estimate::SparseEstimate;

/// Input handed to a [`PitchEstimator`]
#[derive(Debug, Clone, Copy)]
pub struct EstimateRequest<'a> {
    /// Audio file the estimator reads
    pub audio_path: &'a Path,
    /// Fully resolved parameters (floor already reconciled)
    pub parameters: &'a ParameterSet,
}

/// External pitch tracker producing voiced frames for an audio file.
///
/// [`crate::PraatEstimator`] runs Praat in a subprocess. Closures with the
/// same signature implement the trait too, which is how tests substitute a
/// fake estimator.
pub trait PitchEstimator {
    fn estimate(&self, request: &EstimateRequest<'_>) -> Result<SparseEstimate, CollaboratorError>;
}

impl<F> PitchEstimator for F
where
    F: Fn(&EstimateRequest<'_>) -> Result<SparseEstimate, CollaboratorError>,
{
    fn estimate(&self, request: &EstimateRequest<'_>) -> Result<SparseEstimate, CollaboratorError> {
        self(request)
    }
}
