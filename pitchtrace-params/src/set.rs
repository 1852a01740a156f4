//! The typed parameter set and its defaults

use serde::{Deserialize, Serialize};

use crate::key::ParameterKey;
use crate::resolve::ParameterWarning;
use crate::value::ParameterValue;

/// Parameters of Praat's `To Pitch (ac)` command.
///
/// `Default` yields Praat's own defaults. Values passed to the estimator
/// should come from [`crate::resolve`], which reconciles `pitch_floor` with
/// `time_step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Frame shift in seconds (0 = let the estimator choose)
    pub time_step: f64,

    /// Lowest pitch searched for, in Hz. Also sets the analysis window
    /// length (3 periods of the floor).
    pub pitch_floor: f64,

    /// Highest pitch searched for, in Hz
    pub pitch_ceiling: f64,

    /// Maximum number of candidates kept per frame
    pub max_candidates: u32,

    /// Use a Gaussian window of 6 periods instead of a Hanning window of 3
    pub very_accurate: bool,

    pub silence_threshold: f64,
    pub voicing_threshold: f64,
    pub octave_cost: f64,
    pub octave_jump_cost: f64,
    pub voiced_unvoiced_cost: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            time_step: 0.0,
            pitch_floor: 75.0,
            pitch_ceiling: 600.0,
            max_candidates: 15,
            very_accurate: false,
            silence_threshold: 0.03,
            voicing_threshold: 0.45,
            octave_cost: 0.01,
            octave_jump_cost: 0.35,
            voiced_unvoiced_cost: 0.14,
        }
    }
}

impl ParameterSet {
    /// Set the frame shift in seconds
    pub fn time_step(mut self, seconds: f64) -> Self {
        self.time_step = seconds;
        self
    }

    /// Set the pitch floor in Hz
    pub fn pitch_floor(mut self, hz: f64) -> Self {
        self.pitch_floor = hz;
        self
    }

    /// Set the pitch ceiling in Hz
    pub fn pitch_ceiling(mut self, hz: f64) -> Self {
        self.pitch_ceiling = hz;
        self
    }

    /// Set the maximum number of candidates
    pub fn max_candidates(mut self, count: u32) -> Self {
        self.max_candidates = count;
        self
    }

    /// Enable the 6-period Gaussian window
    pub fn very_accurate(mut self, enabled: bool) -> Self {
        self.very_accurate = enabled;
        self
    }

    pub fn silence_threshold(mut self, value: f64) -> Self {
        self.silence_threshold = value;
        self
    }

    pub fn voicing_threshold(mut self, value: f64) -> Self {
        self.voicing_threshold = value;
        self
    }

    pub fn octave_cost(mut self, value: f64) -> Self {
        self.octave_cost = value;
        self
    }

    pub fn octave_jump_cost(mut self, value: f64) -> Self {
        self.octave_jump_cost = value;
        self
    }

    pub fn voiced_unvoiced_cost(mut self, value: f64) -> Self {
        self.voiced_unvoiced_cost = value;
        self
    }

    /// Read a parameter by key.
    pub fn get(&self, key: ParameterKey) -> ParameterValue {
        match key {
            ParameterKey::TimeStep => ParameterValue::Float(self.time_step),
            ParameterKey::PitchFloor => ParameterValue::Float(self.pitch_floor),
            ParameterKey::PitchCeiling => ParameterValue::Float(self.pitch_ceiling),
            ParameterKey::MaxCandidates => ParameterValue::Integer(self.max_candidates as i64),
            ParameterKey::VeryAccurate => ParameterValue::Bool(self.very_accurate),
            ParameterKey::SilenceThreshold => ParameterValue::Float(self.silence_threshold),
            ParameterKey::VoicingThreshold => ParameterValue::Float(self.voicing_threshold),
            ParameterKey::OctaveCost => ParameterValue::Float(self.octave_cost),
            ParameterKey::OctaveJumpCost => ParameterValue::Float(self.octave_jump_cost),
            ParameterKey::VoicedUnvoicedCost => ParameterValue::Float(self.voiced_unvoiced_cost),
        }
    }

    /// All ten (key, value) pairs.
    pub fn entries(&self) -> [(ParameterKey, ParameterValue); 10] {
        ParameterKey::ALL.map(|key| (key, self.get(key)))
    }

    /// Assign `value` to `key` after checking it has the right shape.
    ///
    /// On mismatch nothing is changed and the warning describing the
    /// rejection is returned.
    pub(crate) fn assign(
        &mut self,
        key: ParameterKey,
        value: ParameterValue,
    ) -> Result<(), ParameterWarning> {
        let invalid = |expected: &'static str| ParameterWarning::InvalidValue {
            key,
            value,
            expected,
        };
        let finite = || {
            value
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid("a finite number"))
        };

        match key {
            ParameterKey::MaxCandidates => {
                let count = value
                    .as_f64()
                    .filter(|v| v.fract() == 0.0 && *v >= 1.0 && *v <= u32::MAX as f64)
                    .ok_or_else(|| invalid("a positive integer"))?;
                self.max_candidates = count as u32;
            }
            ParameterKey::VeryAccurate => {
                self.very_accurate = match value {
                    ParameterValue::Bool(b) => b,
                    ParameterValue::Integer(0) => false,
                    ParameterValue::Integer(1) => true,
                    _ => return Err(invalid("a boolean")),
                };
            }
            ParameterKey::TimeStep => self.time_step = finite()?,
            ParameterKey::PitchFloor => self.pitch_floor = finite()?,
            ParameterKey::PitchCeiling => self.pitch_ceiling = finite()?,
            ParameterKey::SilenceThreshold => self.silence_threshold = finite()?,
            ParameterKey::VoicingThreshold => self.voicing_threshold = finite()?,
            ParameterKey::OctaveCost => self.octave_cost = finite()?,
            ParameterKey::OctaveJumpCost => self.octave_jump_cost = finite()?,
            ParameterKey::VoicedUnvoicedCost => self.voiced_unvoiced_cost = finite()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ParameterSet::default();
        assert_eq!(params.time_step, 0.0);
        assert_eq!(params.pitch_floor, 75.0);
        assert_eq!(params.pitch_ceiling, 600.0);
        assert_eq!(params.max_candidates, 15);
        assert!(!params.very_accurate);
        assert_eq!(params.silence_threshold, 0.03);
        assert_eq!(params.voicing_threshold, 0.45);
        assert_eq!(params.octave_cost, 0.01);
        assert_eq!(params.octave_jump_cost, 0.35);
        assert_eq!(params.voiced_unvoiced_cost, 0.14);
    }

    #[test]
    fn test_builder() {
        let params = ParameterSet::default()
            .time_step(0.01)
            .pitch_floor(70.0)
            .pitch_ceiling(500.0)
            .very_accurate(true);

        assert_eq!(params.time_step, 0.01);
        assert_eq!(params.pitch_floor, 70.0);
        assert_eq!(params.pitch_ceiling, 500.0);
        assert!(params.very_accurate);
        assert_eq!(params.max_candidates, 15);
    }

    #[test]
    fn test_entries_cover_every_key() {
        let entries = ParameterSet::default().entries();
        let keys: Vec<ParameterKey> = entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ParameterKey::ALL.to_vec());
    }

    #[test]
    fn test_assign_coerces_integers_to_floats() {
        let mut params = ParameterSet::default();
        params
            .assign(ParameterKey::PitchFloor, ParameterValue::Integer(100))
            .unwrap();
        assert_eq!(params.pitch_floor, 100.0);
    }

    #[test]
    fn test_assign_max_candidates() {
        let mut params = ParameterSet::default();
        params
            .assign(ParameterKey::MaxCandidates, ParameterValue::Float(10.0))
            .unwrap();
        assert_eq!(params.max_candidates, 10);

        assert!(params
            .assign(ParameterKey::MaxCandidates, ParameterValue::Float(2.5))
            .is_err());
        assert!(params
            .assign(ParameterKey::MaxCandidates, ParameterValue::Integer(0))
            .is_err());
        assert_eq!(params.max_candidates, 10);
    }

    #[test]
    fn test_assign_very_accurate() {
        let mut params = ParameterSet::default();
        params
            .assign(ParameterKey::VeryAccurate, ParameterValue::Integer(1))
            .unwrap();
        assert!(params.very_accurate);

        let warning = params
            .assign(ParameterKey::VeryAccurate, ParameterValue::Float(0.5))
            .unwrap_err();
        assert!(matches!(
            warning,
            ParameterWarning::InvalidValue {
                key: ParameterKey::VeryAccurate,
                ..
            }
        ));
        assert!(params.very_accurate);
    }

    #[test]
    fn test_assign_rejects_bool_and_nan_for_numbers() {
        let mut params = ParameterSet::default();
        assert!(params
            .assign(ParameterKey::TimeStep, ParameterValue::Bool(true))
            .is_err());
        assert!(params
            .assign(ParameterKey::OctaveCost, ParameterValue::Float(f64::NAN))
            .is_err());
        assert_eq!(params, ParameterSet::default());
    }

    #[test]
    fn test_serde_json() {
        let params = ParameterSet::default().time_step(0.01);
        let json = serde_json::to_string(&params).unwrap();
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);

        // Missing fields fall back to defaults
        let partial: ParameterSet = serde_json::from_str(r#"{"pitch_floor": 100.0}"#).unwrap();
        assert_eq!(partial.pitch_floor, 100.0);
        assert_eq!(partial.pitch_ceiling, 600.0);
    }
}
