// Tempo and time signature - validated musical timing parameters
// Conversions between bpm / note value and beat duration in seconds

use std::fmt;

use thiserror::Error;

/// Rejected mutation of a timing parameter.
///
/// The prior valid value is always left in place; the message carries
/// the rejected value and the valid range so the caller can surface it
/// to the user directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("BPM must be between 40 and 240, got {value}")]
    InvalidBpm { value: u16 },

    #[error("invalid time signature: {0}")]
    InvalidTimeSignature(#[from] TimeSignatureError),
}

/// Which time signature constraint was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeSignatureError {
    #[error("numerator must be 1-16, got {0}")]
    Numerator(u8),

    #[error("denominator must be 2, 4, 8, or 16, got {0}")]
    Denominator(u8),
}

/// Tempo in BPM (beats per minute), always within [40, 240].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Tempo {
    bpm: u16,
}

impl Tempo {
    pub const MIN_BPM: u16 = 40;
    pub const MAX_BPM: u16 = 240;

    /// Creates a tempo, rejecting values outside [40, 240].
    pub fn new(bpm: u16) -> Result<Self, ValidationError> {
        if !(Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm) {
            return Err(ValidationError::InvalidBpm { value: bpm });
        }
        Ok(Self { bpm })
    }

    /// Get BPM value
    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// Duration of one quarter note in seconds.
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 120 }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

impl TryFrom<u16> for Tempo {
    type Error = ValidationError;

    fn try_from(bpm: u16) -> Result<Self, Self::Error> {
        Self::new(bpm)
    }
}

impl From<Tempo> for u16 {
    fn from(tempo: Tempo) -> Self {
        tempo.bpm
    }
}

/// Time signature (numerator/denominator)
/// Example: 4/4 time = numerator 4, denominator 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct TimeSignature {
    numerator: u8,   // Beats per bar (1-16)
    denominator: u8, // Note value that receives one beat (2, 4, 8, 16)
}

impl TimeSignature {
    pub const MIN_NUMERATOR: u8 = 1;
    pub const MAX_NUMERATOR: u8 = 16;
    pub const VALID_DENOMINATORS: [u8; 4] = [2, 4, 8, 16];

    /// Creates a time signature. Validation is atomic: if either field
    /// is out of range, no signature is produced.
    pub fn new(numerator: u8, denominator: u8) -> Result<Self, TimeSignatureError> {
        if !(Self::MIN_NUMERATOR..=Self::MAX_NUMERATOR).contains(&numerator) {
            return Err(TimeSignatureError::Numerator(numerator));
        }
        if !Self::VALID_DENOMINATORS.contains(&denominator) {
            return Err(TimeSignatureError::Denominator(denominator));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Common 4/4 time signature
    pub fn four_four() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }

    /// Common 3/4 time signature (waltz)
    pub fn three_four() -> Self {
        Self {
            numerator: 3,
            denominator: 4,
        }
    }

    /// Common 6/8 time signature
    pub fn six_eight() -> Self {
        Self {
            numerator: 6,
            denominator: 8,
        }
    }

    pub fn numerator(&self) -> u8 {
        self.numerator
    }

    pub fn denominator(&self) -> u8 {
        self.denominator
    }

    /// Number of beats per bar
    pub fn beats_per_bar(&self) -> u8 {
        self.numerator
    }

    /// Beat duration relative to a quarter note.
    /// Example: x/4 = 1.0, x/8 = 0.5 (eighth notes go twice as fast)
    pub fn beat_duration_multiplier(&self) -> f64 {
        4.0 / self.denominator as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl TryFrom<(u8, u8)> for TimeSignature {
    type Error = TimeSignatureError;

    fn try_from((numerator, denominator): (u8, u8)) -> Result<Self, Self::Error> {
        Self::new(numerator, denominator)
    }
}

impl From<TimeSignature> for (u8, u8) {
    fn from(ts: TimeSignature) -> Self {
        (ts.numerator, ts.denominator)
    }
}
