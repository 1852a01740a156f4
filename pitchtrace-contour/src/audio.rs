//! Mono PCM audio sources
//!
//! The estimator reads the audio file itself; the reconstructor only needs the
//! sample count and native rate to size the dense grid. Samples are decoded
//! anyway so callers can plot or post-process them alongside the contour.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader};
use tracing::info;

use crate::error::{ContourError, Result};

/// A decoded single-channel recording and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    path: PathBuf,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl AudioSource {
    /// Wrap already-decoded samples.
    ///
    /// `path` is what the estimator will be asked to read.
    pub fn from_samples<P: Into<PathBuf>>(path: P, sample_rate: u32, samples: Vec<f32>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(ContourError::audio_load("Sample rate must be positive"));
        }

        Ok(Self {
            path: path.into(),
            sample_rate,
            samples,
        })
    }

    /// Load an uncompressed mono WAV file.
    ///
    /// Integer PCM of 8 to 32 bits and 32-bit float are accepted; samples are
    /// normalized to [-1.0, 1.0].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path).map_err(|e| {
            ContourError::audio_load(format!("Failed to open WAV '{}': {}", path.display(), e))
        })?;

        let spec = reader.spec();
        info!(
            "Loaded WAV: {} Hz, {} channels, {} bits",
            spec.sample_rate, spec.channels, spec.bits_per_sample
        );

        if spec.channels != 1 {
            return Err(ContourError::audio_load(format!(
                "Expected mono audio, found {} channels",
                spec.channels
            )));
        }

        let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| ContourError::audio_load(format!("Failed to read samples: {}", e)))?,
            (SampleFormat::Int, bits @ 8..=32) => {
                let scale = (1_i64 << (bits - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|sample| sample as f32 / scale))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| {
                        ContourError::audio_load(format!("Failed to read samples: {}", e))
                    })?
            }
            (format, bits) => {
                return Err(ContourError::audio_load(format!(
                    "Unsupported sample format: {:?} with {} bits",
                    format, bits
                )))
            }
        };

        Self::from_samples(path, spec.sample_rate, samples)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Native sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Duration in seconds (`sample_count / sample_rate`)
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
