//! Error types for the pulse generator core.

use core::fmt;

/// Errors raised while validating a [`GeneratorConfig`](crate::GeneratorConfig).
///
/// The control loop itself has no error paths: out-of-range knob positions
/// are clamped and noisy button holds are ignored. Only configuration
/// supplied at startup can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Initial amplitude is outside `[AMPLITUDE_MIN, AMPLITUDE_MAX]`.
    AmplitudeOutOfRange,
    /// Initial period is outside `[PERIOD_MIN, PERIOD_MAX]`.
    PeriodOutOfRange,
    /// Stride is zero or longer than the waveform table.
    InvalidStride,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::AmplitudeOutOfRange => write!(f, "initial amplitude out of range"),
            ConfigError::PeriodOutOfRange => write!(f, "initial period out of range"),
            ConfigError::InvalidStride => write!(f, "stride must be between 1 and the table length"),
        }
    }
}
