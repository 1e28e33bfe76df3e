//! Waveform table store.
//!
//! A [`WaveformTable`] holds exactly [`TABLE_LEN`] 12-bit [`Sample`]s and
//! describes one output cycle. The base tables in [`tables`] are immutable
//! statics; the controller keeps one mutable working table derived from the
//! selected base table by the [amplitude scaler](crate::scaler).

use core::ops::Index;

use crate::config::{SAMPLE_MAX, SAMPLE_MIDPOINT, TABLE_LEN};

pub mod tables;

// ── Sample ───────────────────────────────────────────────────────────────

/// One 12-bit DAC code, always within `0..=4095`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample(u16);

impl Sample {
    /// Lowest output level.
    pub const MIN: Sample = Sample(0);
    /// Highest output level.
    pub const MAX: Sample = Sample(SAMPLE_MAX);
    /// DC level of every waveform.
    pub const MIDPOINT: Sample = Sample(SAMPLE_MIDPOINT);

    /// Wrap a DAC code, returning `None` if it exceeds 12 bits.
    pub const fn new(code: u16) -> Option<Self> {
        if code <= SAMPLE_MAX {
            Some(Sample(code))
        } else {
            None
        }
    }

    /// Wrap a DAC code, clamping it into `0..=4095`.
    pub const fn saturating(code: i32) -> Self {
        if code < 0 {
            Sample::MIN
        } else if code > SAMPLE_MAX as i32 {
            Sample::MAX
        } else {
            Sample(code as u16)
        }
    }

    /// The raw DAC code.
    pub const fn code(self) -> u16 {
        self.0
    }
}

impl Default for Sample {
    fn default() -> Self {
        Sample::MIDPOINT
    }
}

// ── WaveformTable ────────────────────────────────────────────────────────

/// Fixed-length table of samples covering one output cycle.
///
/// The length is part of the type, so every base table and the working
/// table are guaranteed to agree on [`TABLE_LEN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformTable {
    samples: [Sample; TABLE_LEN],
}

impl WaveformTable {
    /// Build a table from raw codes.
    ///
    /// Intended for `static` initialisers: a code above 4095 panics during
    /// const evaluation, which turns a bad table into a build failure.
    pub const fn from_codes(codes: &[u16; TABLE_LEN]) -> Self {
        let mut samples = [Sample::MIDPOINT; TABLE_LEN];
        let mut i = 0;
        while i < TABLE_LEN {
            samples[i] = match Sample::new(codes[i]) {
                Some(sample) => sample,
                None => panic!("waveform code exceeds the 12-bit range"),
            };
            i += 1;
        }
        Self { samples }
    }

    /// A flat table at a single level.
    pub const fn filled(level: Sample) -> Self {
        Self {
            samples: [level; TABLE_LEN],
        }
    }

    /// All samples in output order.
    pub fn samples(&self) -> &[Sample; TABLE_LEN] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [Sample; TABLE_LEN] {
        &mut self.samples
    }
}

impl Default for WaveformTable {
    fn default() -> Self {
        Self::filled(Sample::MIDPOINT)
    }
}

impl Index<usize> for WaveformTable {
    type Output = Sample;

    fn index(&self, index: usize) -> &Sample {
        &self.samples[index]
    }
}

// ── Waveform selection ───────────────────────────────────────────────────

/// The base tables shipped with the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    /// Positive then negative lobe, the stock stimulus pulse.
    #[default]
    Biphasic,
    /// Symmetric triangle.
    Triangle,
    /// 50 % duty square.
    Square,
    /// Rising sawtooth.
    Ramp,
}

impl Waveform {
    /// Every selectable waveform, in menu order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Biphasic,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Ramp,
    ];

    /// The immutable base table for this waveform.
    pub fn table(self) -> &'static WaveformTable {
        match self {
            Waveform::Biphasic => &tables::BIPHASIC,
            Waveform::Triangle => &tables::TRIANGLE,
            Waveform::Square => &tables::SQUARE,
            Waveform::Ramp => &tables::RAMP,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Waveform::Biphasic => "Biphasic",
            Waveform::Triangle => "Triangle",
            Waveform::Square => "Square",
            Waveform::Ramp => "Ramp",
        }
    }
}
