//! Amplitude scaler.
//!
//! Derives the working table from a base table and an amplitude setting:
//!
//! ```text
//! scalar     = amplitude / AMPLITUDE_MAX          (0, 1]
//! offset     = MIDPOINT - MIDPOINT * scalar
//! working[i] = round(base[i] * scalar + offset)
//! ```
//!
//! Rearranged as `MIDPOINT + round((base[i] - MIDPOINT) * amplitude / MAX)`,
//! the whole computation runs in integers, so a base sample at the midpoint
//! stays exactly at the midpoint for every setting. Halves round up, as
//! `round()` does on the always-positive unscaled value.

use crate::config::{AMPLITUDE_MAX, AMPLITUDE_MIN, SAMPLE_MIDPOINT};
use crate::waveform::{Sample, WaveformTable};

/// Scale a single sample towards the midpoint.
///
/// `amplitude` is expected within `[AMPLITUDE_MIN, AMPLITUDE_MAX]`; values
/// outside are clamped first.
pub fn scale_sample(base: Sample, amplitude: i32) -> Sample {
    let amplitude = amplitude.clamp(AMPLITUDE_MIN, AMPLITUDE_MAX);
    let mid = SAMPLE_MIDPOINT as i32;
    let deviation = (base.code() as i32 - mid) * amplitude;
    Sample::saturating(mid + div_round_half_up(deviation, AMPLITUDE_MAX))
}

/// Recompute `working` from `base` at the given amplitude setting.
///
/// # Examples
///
/// ```
/// use pulsegen_core::scaler::recompute_into;
/// use pulsegen_core::waveform::{Sample, Waveform, WaveformTable};
///
/// let mut working = WaveformTable::default();
/// recompute_into(&mut working, Waveform::Biphasic.table(), 5);
///
/// // The midpoint samples of the base table are untouched.
/// assert_eq!(working[300], Sample::MIDPOINT);
/// ```
pub fn recompute_into(working: &mut WaveformTable, base: &WaveformTable, amplitude: i32) {
    for (out, &sample) in working.samples_mut().iter_mut().zip(base.samples()) {
        *out = scale_sample(sample, amplitude);
    }
}

/// Build a new working table from `base` at the given amplitude setting.
pub fn recompute(base: &WaveformTable, amplitude: i32) -> WaveformTable {
    let mut working = WaveformTable::default();
    recompute_into(&mut working, base, amplitude);
    working
}

/// Integer division rounding half towards positive infinity.
fn div_round_half_up(numerator: i32, denominator: i32) -> i32 {
    (numerator + denominator / 2).div_euclid(denominator)
}
