//! Hardware seams used by the controller.
//!
//! The core never touches a register. Each physical resource is reached
//! through one of these traits, implemented by the firmware crate for real
//! pins and by the test fakes for simulated time.

use crate::waveform::Sample;

/// Monotonic time source with a blocking wait.
pub trait Clock {
    /// Microseconds since an arbitrary epoch. Must never go backwards.
    fn now_micros(&self) -> u64;

    /// Block until [`now_micros()`](Self::now_micros) reaches `deadline`.
    /// Returns immediately if the deadline has already passed.
    fn wait_until(&mut self, deadline: u64);

    /// Milliseconds since the same epoch.
    fn now_millis(&self) -> u64 {
        self.now_micros() / 1000
    }
}

/// The waveform analog output.
pub trait SampleSink {
    /// Drive the output to `sample`. Must not block for longer than one
    /// sample period.
    fn write_sample(&mut self, sample: Sample);
}

/// Digital inputs on the front panel.
///
/// All inputs are wired active-low with pull-ups; implementations report the
/// logical state, so `true` means the switch is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelInput {
    /// Toggles the armed state (single-fire mode only).
    Arm,
    /// Fires one pulse while armed.
    Trigger,
    /// Inserts a pause between continuous pulses.
    SlowPulse,
    /// Closed selects single-fire mode, open selects continuous output.
    SingleFireMode,
}

/// Indicator lamps on the front panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lamp {
    Armed,
    Fired,
}

/// Front-panel switches, lamps and the sync output.
pub trait ControlPanel {
    /// Logical state of `input` (`true` = switch closed).
    fn is_active(&mut self, input: PanelInput) -> bool;

    /// Turn `lamp` on or off.
    fn set_lamp(&mut self, lamp: Lamp, lit: bool);

    /// Flip the sync output used as an oscilloscope trigger reference.
    fn toggle_sync(&mut self);
}

/// The two rotary encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Knob {
    Amplitude,
    Period,
}

/// Access to the raw accumulated position of each encoder.
///
/// Positions are in raw counts; the [input tracker](crate::input) divides
/// them by [`QUADRATURE_FACTOR`](crate::config::QUADRATURE_FACTOR).
#[allow(async_fn_in_trait)]
pub trait EncoderPort {
    /// Transport error (e.g. an I2C bus failure).
    type Error;

    /// Read the raw position of `knob`.
    async fn read_position(&mut self, knob: Knob) -> Result<i32, Self::Error>;

    /// Overwrite the raw position of `knob`.
    async fn write_position(&mut self, knob: Knob, position: i32) -> Result<(), Self::Error>;
}
