//! Input tracker for the amplitude and period encoders.
//!
//! Each poll reads the raw encoder position, converts it to a logical step
//! by dividing by [`QUADRATURE_FACTOR`], and clamps it to the knob's range.
//! When clamping moves the value, the clamped position is written back to
//! the encoder so that turning past an end stop does not build up a backlog
//! of counts the user has to unwind.

use crate::config::{AMPLITUDE_MAX, AMPLITUDE_MIN, PERIOD_MAX, PERIOD_MIN, QUADRATURE_FACTOR};
use crate::hal::{EncoderPort, Knob};
use crate::setting::Setting;

/// Which settings moved during one [`InputTracker::poll()`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputChanges {
    pub amplitude: bool,
    pub period: bool,
}

impl InputChanges {
    /// Returns `true` if either setting changed.
    pub fn any(&self) -> bool {
        self.amplitude || self.period
    }
}

/// One encoder and the setting it drives.
#[derive(Debug, Clone, Copy)]
struct KnobTracker {
    knob: Knob,
    setting: Setting,
}

impl KnobTracker {
    async fn poll<E: EncoderPort>(&mut self, port: &mut E) -> Result<bool, E::Error> {
        let raw = port.read_position(self.knob).await?;
        let step = raw / QUADRATURE_FACTOR;
        if step == self.setting.value() {
            return Ok(false);
        }

        let clamped = self.setting.clamp(step);
        if clamped != step {
            #[cfg(feature = "defmt")]
            defmt::debug!("{} encoder at {} clamped to {}", self.knob, step, clamped);
            port.write_position(self.knob, clamped * QUADRATURE_FACTOR).await?;
        }

        Ok(self.setting.set(clamped))
    }

    async fn sync<E: EncoderPort>(&self, port: &mut E) -> Result<(), E::Error> {
        port.write_position(self.knob, self.setting.value() * QUADRATURE_FACTOR)
            .await
    }
}

/// Tracks the amplitude and period settings against their encoders.
///
/// # Examples
///
/// ```
/// # use pulsegen_core::hal::{EncoderPort, Knob};
/// # struct Knobs([i32; 2]);
/// # impl EncoderPort for Knobs {
/// #     type Error = ();
/// #     async fn read_position(&mut self, knob: Knob) -> Result<i32, ()> { Ok(self.0[knob as usize]) }
/// #     async fn write_position(&mut self, knob: Knob, p: i32) -> Result<(), ()> { self.0[knob as usize] = p; Ok(()) }
/// # }
/// use pulsegen_core::input::InputTracker;
///
/// let mut knobs = Knobs([60, 16]); // amplitude step 15, period step 4
/// let mut tracker = InputTracker::new(5, 4);
///
/// let changes = embassy_futures::block_on(tracker.poll(&mut knobs)).unwrap();
/// assert!(changes.amplitude);
/// assert_eq!(tracker.amplitude(), 10);
/// assert_eq!(knobs.0[0], 40); // written back
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InputTracker {
    amplitude: KnobTracker,
    period: KnobTracker,
}

impl InputTracker {
    /// Create a tracker with the given starting settings (clamped).
    pub fn new(amplitude: i32, period: i32) -> Self {
        Self {
            amplitude: KnobTracker {
                knob: Knob::Amplitude,
                setting: Setting::new(amplitude, AMPLITUDE_MIN, AMPLITUDE_MAX),
            },
            period: KnobTracker {
                knob: Knob::Period,
                setting: Setting::new(period, PERIOD_MIN, PERIOD_MAX),
            },
        }
    }

    /// Current amplitude setting, within `[AMPLITUDE_MIN, AMPLITUDE_MAX]`.
    pub fn amplitude(&self) -> i32 {
        self.amplitude.setting.value()
    }

    /// Current period setting, within `[PERIOD_MIN, PERIOD_MAX]`.
    pub fn period(&self) -> i32 {
        self.period.setting.value()
    }

    /// Write the current settings to the encoders so that their raw
    /// positions start out in step with the tracker.
    pub async fn sync<E: EncoderPort>(&self, port: &mut E) -> Result<(), E::Error> {
        self.amplitude.sync(port).await?;
        self.period.sync(port).await
    }

    /// Read both encoders and update the settings.
    ///
    /// Amplitude is read before period. A transport error aborts the poll;
    /// any setting not yet updated keeps its previous value and is picked up
    /// again on the next poll.
    pub async fn poll<E: EncoderPort>(&mut self, port: &mut E) -> Result<InputChanges, E::Error> {
        let amplitude = self.amplitude.poll(port).await?;
        let period = self.period.poll(port).await?;
        Ok(InputChanges { amplitude, period })
    }
}
