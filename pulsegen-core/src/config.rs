//! Build-time constants and the runtime [`GeneratorConfig`].
//!
//! Everything in this module is fixed when the firmware is compiled. The
//! relationships between the constants are checked by `const` assertions at
//! the bottom of the file, so a bad edit fails the build instead of producing
//! a generator that loops with a zero or wrapped sample period.

use crate::emitter::Stride;
use crate::error::ConfigError;
use crate::waveform::Waveform;

// ── Waveform geometry ────────────────────────────────────────────────────

/// Number of samples in every waveform table (one output cycle).
pub const TABLE_LEN: usize = 600;

/// Largest 12-bit DAC code.
pub const SAMPLE_MAX: u16 = 4095;

/// DAC code of the waveform's DC level (half of the 12-bit range).
pub const SAMPLE_MIDPOINT: u16 = 2048;

/// Sample-skip factor of the normal (fast) emission path. Also the divisor
/// that converts a period setting into milliseconds for display.
pub const SAMPLE_RESOLUTION: usize = 4;

// ── Encoder settings ─────────────────────────────────────────────────────

/// Raw encoder counts per logical setting step.
pub const QUADRATURE_FACTOR: i32 = 4;

/// Smallest amplitude setting (10 % of full scale).
pub const AMPLITUDE_MIN: i32 = 1;

/// Largest amplitude setting (no attenuation).
pub const AMPLITUDE_MAX: i32 = 10;

/// Amplitude setting applied at power-on.
pub const AMPLITUDE_DEFAULT: i32 = 10;

/// Smallest period setting, in quarter milliseconds.
pub const PERIOD_MIN: i32 = 4;

/// Largest period setting, in quarter milliseconds.
pub const PERIOD_MAX: i32 = 100;

/// Period setting applied at power-on.
pub const PERIOD_DEFAULT: i32 = 4;

/// Level shown for each amplitude setting, indexed by `setting - 1`.
pub const AMPLITUDE_LEVELS: [f32; AMPLITUDE_MAX as usize] =
    [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

// ── Timing ───────────────────────────────────────────────────────────────

/// Per-pulse processing latency, in period-setting units, subtracted before
/// the sample period is derived. Measured on the reference board.
pub const TIMING_OVERHEAD: i32 = 3;

/// Lower bound (inclusive) of the hold duration that produces a toggle.
pub const DEBOUNCE_ACCEPT_MIN_MS: u64 = 200;

/// Upper bound (exclusive) of the hold duration that produces a toggle.
pub const DEBOUNCE_ACCEPT_MAX_MS: u64 = 300;

/// Arm input: the window is restarted only after this much idle time.
pub const ARM_STALE_MS: u64 = 3000;

/// Trigger input: the window is restarted only after this much idle time.
pub const TRIGGER_STALE_MS: u64 = 2500;

/// The fired lamp turns off once this long has passed since the trigger
/// window was last reset.
pub const FIRED_LAMP_CLEAR_MS: u64 = 300 + 500;

/// Pause inserted after each continuous pulse while the slow flag is held.
pub const SLOW_PULSE_PAUSE_MS: u64 = 500;

// ── Runtime configuration ────────────────────────────────────────────────

/// Startup configuration for a [`PulseGenerator`](crate::PulseGenerator).
///
/// [`GeneratorConfig::default()`] reproduces the stock firmware: the
/// biphasic pulse table, the fast emission stride, full amplitude and the
/// shortest period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeneratorConfig {
    /// Base table the working table is derived from.
    pub waveform: Waveform,
    /// Sample stride used for every pulse.
    pub stride: Stride,
    /// Amplitude setting at power-on, within `[AMPLITUDE_MIN, AMPLITUDE_MAX]`.
    pub initial_amplitude: i32,
    /// Period setting at power-on, within `[PERIOD_MIN, PERIOD_MAX]`.
    pub initial_period: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Biphasic,
            stride: Stride::FAST,
            initial_amplitude: AMPLITUDE_DEFAULT,
            initial_period: PERIOD_DEFAULT,
        }
    }
}

impl GeneratorConfig {
    /// Check the runtime values against the build-time bounds.
    ///
    /// Called by [`PulseGenerator::new()`](crate::PulseGenerator::new), so an
    /// invalid configuration is rejected before any pin is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(AMPLITUDE_MIN..=AMPLITUDE_MAX).contains(&self.initial_amplitude) {
            return Err(ConfigError::AmplitudeOutOfRange);
        }
        if !(PERIOD_MIN..=PERIOD_MAX).contains(&self.initial_period) {
            return Err(ConfigError::PeriodOutOfRange);
        }
        Ok(())
    }
}

// ── Build-time invariants ────────────────────────────────────────────────

const _: () = assert!(PERIOD_MIN >= TIMING_OVERHEAD, "period floor must cover the timing overhead");
const _: () = assert!(PERIOD_MIN <= PERIOD_DEFAULT && PERIOD_DEFAULT <= PERIOD_MAX);
const _: () = assert!(AMPLITUDE_MIN >= 1 && AMPLITUDE_MIN <= AMPLITUDE_DEFAULT);
const _: () = assert!(AMPLITUDE_DEFAULT <= AMPLITUDE_MAX);
const _: () = assert!(SAMPLE_MIDPOINT as u32 * 2 == SAMPLE_MAX as u32 + 1);
const _: () = assert!(SAMPLE_RESOLUTION >= 1 && SAMPLE_RESOLUTION <= TABLE_LEN);
const _: () = assert!(QUADRATURE_FACTOR > 0);
const _: () = assert!(DEBOUNCE_ACCEPT_MIN_MS < DEBOUNCE_ACCEPT_MAX_MS);
const _: () = assert!(DEBOUNCE_ACCEPT_MAX_MS < TRIGGER_STALE_MS && DEBOUNCE_ACCEPT_MAX_MS < ARM_STALE_MS);
const _: () = assert!(FIRED_LAMP_CLEAR_MS > DEBOUNCE_ACCEPT_MAX_MS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GeneratorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_initial_values_are_rejected() {
        let amp = GeneratorConfig {
            initial_amplitude: 11,
            ..GeneratorConfig::default()
        };
        assert_eq!(amp.validate(), Err(ConfigError::AmplitudeOutOfRange));

        let period = GeneratorConfig {
            initial_period: 3,
            ..GeneratorConfig::default()
        };
        assert_eq!(period.validate(), Err(ConfigError::PeriodOutOfRange));
    }

    #[test]
    fn amplitude_levels_cover_every_setting() {
        assert_eq!(AMPLITUDE_LEVELS.len() as i32, AMPLITUDE_MAX - AMPLITUDE_MIN + 1);
        assert_eq!(AMPLITUDE_LEVELS[0], 1.0);
        assert_eq!(AMPLITUDE_LEVELS[9], 10.0);
    }
}
