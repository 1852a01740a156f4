//! The closed set of recognized parameter names

use std::fmt;

/// One of the ten knobs of the pitch tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterKey {
    TimeStep,
    PitchFloor,
    PitchCeiling,
    MaxCandidates,
    VeryAccurate,
    SilenceThreshold,
    VoicingThreshold,
    OctaveCost,
    OctaveJumpCost,
    VoicedUnvoicedCost,
}

impl ParameterKey {
    /// Every key, in declaration order.
    pub const ALL: [ParameterKey; 10] = [
        Self::TimeStep,
        Self::PitchFloor,
        Self::PitchCeiling,
        Self::MaxCandidates,
        Self::VeryAccurate,
        Self::SilenceThreshold,
        Self::VoicingThreshold,
        Self::OctaveCost,
        Self::OctaveJumpCost,
        Self::VoicedUnvoicedCost,
    ];

    /// Canonical snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            Self::TimeStep => "time_step",
            Self::PitchFloor => "pitch_floor",
            Self::PitchCeiling => "pitch_ceiling",
            Self::MaxCandidates => "max_candidates",
            Self::VeryAccurate => "very_accurate",
            Self::SilenceThreshold => "silence_threshold",
            Self::VoicingThreshold => "voicing_threshold",
            Self::OctaveCost => "octave_cost",
            Self::OctaveJumpCost => "octave_jump_cost",
            Self::VoicedUnvoicedCost => "voiced_unvoiced_cost",
        }
    }

    /// Look up a key by name.
    ///
    /// Accepts the canonical names plus `max_n_candidates`, the spelling
    /// used by older analysis scripts.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "max_n_candidates" {
            return Some(Self::MaxCandidates);
        }
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
