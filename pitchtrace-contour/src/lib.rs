//! Dense F0 contours from Praat's autocorrelation pitch tracker.
//!
//! Praat reports pitch only for voiced frames. This crate runs it on a WAV
//! file, infers the frame rate from the sparse output, and lays the values
//! onto a uniform grid covering the whole recording, with `None` wherever no
//! pitch was reported.
//!
//! ```no_run
//! use pitchtrace_contour::analyze_parts;
//! use pitchtrace_params::ParameterOverrides;
//!
//! let overrides = ParameterOverrides::new()
//!     .set("time_step", 0.01)
//!     .set("pitch_floor", 70)
//!     .set("pitch_ceiling", 500);
//!
//! let (pitch, time, parameters) = analyze_parts("speech.wav", Some(&overrides))?;
//! # Ok::<(), pitchtrace_contour::ContourError>(())
//! ```

mod analyzer;
mod audio;
mod contour;
mod error;
mod estimate;
mod estimator;
mod praat;
mod scratch;

pub use analyzer::{analyze, analyze_parts, ContourParts, PitchAnalyzer};
pub use audio::AudioSource;
pub use contour::{ContourGrid, DenseContour, Projection, SLOT_SNAP_TOLERANCE};
pub use error::{CollaboratorError, ContourError, Result};
pub use estimate::{EstimatePoint, SparseEstimate};
pub use estimator::{EstimateRequest, PitchEstimator};
pub use praat::{
    bundled_script_path, estimator_args, PraatConfig, PraatEstimator, DEFAULT_PRAAT_BINARY,
    DEFAULT_TIMEOUT,
};
pub use scratch::ScratchArtifact;

// Parameter types appearing in this crate's API
pub use pitchtrace_params::{ParameterOverrides, ParameterSet};
