//! Sample clock and emitter.
//!
//! [`emit()`] walks a working table at a fixed inter-sample period and writes
//! every `stride`-th sample to the analog output. It is deliberately
//! blocking: no input is sampled until the whole pulse has been written.

use crate::config::{SAMPLE_RESOLUTION, TABLE_LEN, TIMING_OVERHEAD};
use crate::error::ConfigError;
use crate::hal::{Clock, SampleSink};
use crate::waveform::WaveformTable;

/// Sample-skip factor, always within `1..=TABLE_LEN`.
///
/// A stride of 1 emits every sample (full resolution, longest pulse); a
/// stride of [`SAMPLE_RESOLUTION`] is the normal fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stride(usize);

impl Stride {
    /// Every sample.
    pub const FULL: Stride = Stride(1);
    /// Every [`SAMPLE_RESOLUTION`]-th sample.
    pub const FAST: Stride = Stride(SAMPLE_RESOLUTION);

    /// Returns [`ConfigError::InvalidStride`] unless `1 <= step <= TABLE_LEN`.
    pub const fn new(step: usize) -> Result<Self, ConfigError> {
        if step == 0 || step > TABLE_LEN {
            Err(ConfigError::InvalidStride)
        } else {
            Ok(Stride(step))
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of samples one pulse writes: `ceil(TABLE_LEN / stride)`.
    pub const fn samples_per_pulse(self) -> usize {
        TABLE_LEN.div_ceil(self.0)
    }
}

impl Default for Stride {
    fn default() -> Self {
        Stride::FAST
    }
}

/// Inter-sample period in microseconds for a period setting.
///
/// `max(0, period - TIMING_OVERHEAD) * 1000 / TABLE_LEN`. The period clamp
/// in the input tracker keeps the setting at or above the overhead, so the
/// saturation only guards against misuse.
///
/// ```
/// use pulsegen_core::emitter::sample_period_us;
///
/// assert_eq!(sample_period_us(4), 1);     // 1000 / 600
/// assert_eq!(sample_period_us(100), 161); // 97000 / 600
/// assert_eq!(sample_period_us(2), 0);
/// ```
pub const fn sample_period_us(period: i32) -> u64 {
    let active = period - TIMING_OVERHEAD;
    if active <= 0 {
        0
    } else {
        active as u64 * 1000 / TABLE_LEN as u64
    }
}

/// Write one pulse of `table` to `sink`.
///
/// The first sample goes out immediately; each following sample waits until
/// at least [`sample_period_us(period)`](sample_period_us) has passed since
/// the previous write. Returns the number of samples written.
pub fn emit<C, S>(clock: &mut C, sink: &mut S, table: &WaveformTable, period: i32, stride: Stride) -> usize
where
    C: Clock,
    S: SampleSink,
{
    let sample_period = sample_period_us(period);
    let mut deadline = clock.now_micros();
    let mut written = 0;

    for sample in table.samples().iter().step_by(stride.get()) {
        clock.wait_until(deadline);
        sink.write_sample(*sample);
        deadline = clock.now_micros().saturating_add(sample_period);
        written += 1;
    }

    written
}
