//! In-memory stand-ins for the hardware seams, used by the unit tests.

use std::cell::Cell;
use std::rc::Rc;

use crate::hal::{Clock, ControlPanel, EncoderPort, Knob, Lamp, PanelInput, SampleSink};
use crate::status::{StatusChange, StatusPresenter, StatusSnapshot};
use crate::waveform::Sample;

// ── Clock ────────────────────────────────────────────────────────────────

/// Simulated monotonic clock. `wait_until` jumps straight to the deadline.
///
/// Clones share the same time, so a test can keep a handle while the code
/// under test owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_micros: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_micros)),
        }
    }

    pub fn set_millis(&self, millis: u64) {
        let target = millis * 1000;
        assert!(target >= self.now.get(), "clock must not go backwards");
        self.now.set(target);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> u64 {
        self.now.get()
    }

    fn wait_until(&mut self, deadline: u64) {
        if deadline > self.now.get() {
            self.now.set(deadline);
        }
    }
}

// ── DAC ──────────────────────────────────────────────────────────────────

/// Records every sample written, optionally with the write time.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub samples: Vec<Sample>,
    pub times: Vec<u64>,
    clock: Option<ManualClock>,
}

impl RecordingSink {
    /// A sink that also stamps each write with `clock`'s current time.
    pub fn timed(clock: &ManualClock) -> Self {
        Self {
            clock: Some(clock.clone()),
            ..Self::default()
        }
    }
}

impl SampleSink for RecordingSink {
    fn write_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
        if let Some(clock) = &self.clock {
            self.times.push(clock.now_micros());
        }
    }
}

// ── Encoders ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeBusError;

/// Two encoders holding raw positions in memory.
#[derive(Debug, Default)]
pub struct FakeEncoders {
    positions: [i32; 2],
    /// Every `write_position` call, in order.
    pub writes: Vec<(Knob, i32)>,
    /// When set, every read fails with [`FakeBusError`].
    pub fail_reads: bool,
}

impl FakeEncoders {
    pub fn at(amplitude_raw: i32, period_raw: i32) -> Self {
        Self {
            positions: [amplitude_raw, period_raw],
            ..Self::default()
        }
    }

    pub fn position(&self, knob: Knob) -> i32 {
        self.positions[knob as usize]
    }

    /// Move a knob without recording a write (the user turning it).
    pub fn set_position(&mut self, knob: Knob, raw: i32) {
        self.positions[knob as usize] = raw;
    }
}

impl EncoderPort for FakeEncoders {
    type Error = FakeBusError;

    async fn read_position(&mut self, knob: Knob) -> Result<i32, FakeBusError> {
        if self.fail_reads {
            return Err(FakeBusError);
        }
        Ok(self.positions[knob as usize])
    }

    async fn write_position(&mut self, knob: Knob, position: i32) -> Result<(), FakeBusError> {
        self.positions[knob as usize] = position;
        self.writes.push((knob, position));
        Ok(())
    }
}

// ── Panel ────────────────────────────────────────────────────────────────

/// Front panel with switch states set by the test.
#[derive(Debug, Default)]
pub struct FakePanel {
    inputs: [bool; 4],
    lamps: [bool; 2],
    /// Every `set_lamp` call, in order.
    pub lamp_writes: Vec<(Lamp, bool)>,
    pub sync_toggles: usize,
}

impl FakePanel {
    pub fn set(&mut self, input: PanelInput, active: bool) {
        self.inputs[input as usize] = active;
    }

    pub fn lamp(&self, lamp: Lamp) -> bool {
        self.lamps[lamp as usize]
    }
}

impl ControlPanel for FakePanel {
    fn is_active(&mut self, input: PanelInput) -> bool {
        self.inputs[input as usize]
    }

    fn set_lamp(&mut self, lamp: Lamp, lit: bool) {
        self.lamps[lamp as usize] = lit;
        self.lamp_writes.push((lamp, lit));
    }

    fn toggle_sync(&mut self) {
        self.sync_toggles += 1;
    }
}

// ── Presenter ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<(StatusSnapshot, StatusChange)>,
}

impl RecordingPresenter {
    pub fn count(&self, change: StatusChange) -> usize {
        self.events.iter().filter(|(_, c)| *c == change).count()
    }

    pub fn last(&self) -> Option<&(StatusSnapshot, StatusChange)> {
        self.events.last()
    }
}

impl StatusPresenter for RecordingPresenter {
    fn present(&mut self, status: &StatusSnapshot, change: StatusChange) {
        self.events.push((*status, change));
    }
}
