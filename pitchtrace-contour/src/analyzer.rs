//! The analysis entry point: audio in, dense contour out

use std::path::Path;

use pitchtrace_params::{resolve, ParameterOverrides, ParameterSet};
use tracing::info;

use crate::audio::AudioSource;
use crate::contour::DenseContour;
use crate::error::Result;
use crate::estimator::{EstimateRequest, PitchEstimator};
use crate::praat::{PraatConfig, PraatEstimator};

/// `(pitch, time, parameters)`: pitch per slot (`None` where unvoiced), slot
/// times in seconds and the parameters the estimator ran with
pub type ContourParts = (Vec<Option<f64>>, Vec<f64>, ParameterSet);

/// Runs an estimator and rebuilds its output as a dense contour.
///
/// Each call is independent. Calls may run concurrently as long as the
/// estimator allows it; [`PraatEstimator`] does.
#[derive(Debug, Clone, Default)]
pub struct PitchAnalyzer<E = PraatEstimator> {
    estimator: E,
}

impl PitchAnalyzer<PraatEstimator> {
    /// Analyzer backed by Praat with the given launch settings
    pub fn praat(config: PraatConfig) -> Self {
        Self::new(PraatEstimator::new(config))
    }
}

impl<E: PitchEstimator> PitchAnalyzer<E> {
    pub fn new(estimator: E) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Estimate pitch for `audio` with already-resolved `parameters`.
    pub fn reconstruct(&self, audio: &AudioSource, parameters: &ParameterSet) -> Result<DenseContour> {
        let request = EstimateRequest {
            audio_path: audio.path(),
            parameters,
        };
        let estimate = self.estimator.estimate(&request)?;

        let contour = DenseContour::reconstruct(&estimate, audio.duration_secs(), *parameters)?;
        info!(
            "Contour for {}: {} slots at {} Hz, {} voiced",
            audio.path().display(),
            contour.len(),
            contour.rate(),
            contour.voiced_count()
        );
        Ok(contour)
    }

    /// Load `audio_path`, resolve `overrides` and reconstruct.
    pub fn analyze_file<P: AsRef<Path>>(
        &self,
        audio_path: P,
        overrides: Option<&ParameterOverrides>,
    ) -> Result<DenseContour> {
        let audio = AudioSource::load(audio_path)?;
        let parameters = resolve(overrides);
        self.reconstruct(&audio, &parameters)
    }

    /// [`analyze_file`](Self::analyze_file), split into its parts.
    pub fn analyze_parts<P: AsRef<Path>>(
        &self,
        audio_path: P,
        overrides: Option<&ParameterOverrides>,
    ) -> Result<ContourParts> {
        self.analyze_file(audio_path, overrides)
            .map(DenseContour::into_parts)
    }
}

/// Dense pitch contour of a mono WAV file, estimated by Praat with default
/// launch settings.
///
/// `overrides` are merged over the default parameters; see
/// [`pitchtrace_params::resolve`]. Use [`DenseContour::into_parts`] to get
/// the pitch and time sequences and the effective parameters.
pub fn analyze<P: AsRef<Path>>(audio_path: P, overrides: Option<&ParameterOverrides>) -> Result<DenseContour> {
    PitchAnalyzer::<PraatEstimator>::default().analyze_file(audio_path, overrides)
}

/// [`analyze`] returning `(pitch, time, parameters)` directly.
pub fn analyze_parts<P: AsRef<Path>>(
    audio_path: P,
    overrides: Option<&ParameterOverrides>,
) -> Result<ContourParts> {
    PitchAnalyzer::<PraatEstimator>::default().analyze_parts(audio_path, overrides)
}
