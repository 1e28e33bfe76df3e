//! The amplitude and period knobs on a Seesaw quad encoder board.

use embedded_hal_async::i2c::I2c;
use pulsegen_core::hal::{EncoderPort, Knob};

use crate::driver::SeesawDriver;
use crate::error::EncoderError;
use crate::registers::position_register;

/// Which encoder on the board drives each knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnobChannels {
    pub amplitude: u8,
    pub period: u8,
}

impl Default for KnobChannels {
    fn default() -> Self {
        Self {
            amplitude: 0,
            period: 1,
        }
    }
}

impl KnobChannels {
    /// Encoder index wired to `knob`.
    pub fn encoder(&self, knob: Knob) -> u8 {
        match knob {
            Knob::Amplitude => self.amplitude,
            Knob::Period => self.period,
        }
    }
}

/// Encoder board exposing two of its encoders as the generator's knobs.
///
/// Positions are passed through raw; the core divides them by the
/// quadrature factor.
///
/// # Example
///
/// ```no_run
/// # async fn demo<I2C: embedded_hal_async::i2c::I2c>(i2c: I2C) {
/// use pulsegen_core::hal::{EncoderPort, Knob};
/// use pulsegen_encoder::{KnobBoard, KnobChannels, DEFAULT_ADDRESS};
///
/// let mut knobs = KnobBoard::new(i2c, DEFAULT_ADDRESS, KnobChannels::default());
/// let raw = knobs.read_position(Knob::Period).await;
/// # }
/// ```
pub struct KnobBoard<I2C> {
    driver: SeesawDriver<I2C>,
    channels: KnobChannels,
}

impl<I2C> KnobBoard<I2C>
where
    I2C: I2c,
{
    /// Create the board interface. No bus traffic happens here.
    pub fn new(i2c: I2C, address: u8, channels: KnobChannels) -> Self {
        Self {
            driver: SeesawDriver::new(i2c, address),
            channels,
        }
    }

    fn register(&self, knob: Knob) -> Result<[u8; 2], EncoderError<I2C::Error>> {
        let encoder = self.channels.encoder(knob);
        position_register(encoder).ok_or(EncoderError::InvalidEncoder(encoder))
    }
}

impl<I2C> EncoderPort for KnobBoard<I2C>
where
    I2C: I2c,
{
    type Error = EncoderError<I2C::Error>;

    /// # Errors
    /// * [`EncoderError::InvalidEncoder`] if the knob maps to an index >= 4
    /// * [`EncoderError::I2c`] on communication failure
    async fn read_position(&mut self, knob: Knob) -> Result<i32, Self::Error> {
        let register = self.register(knob)?;
        self.driver.read_i32(&register).await
    }

    /// # Errors
    /// * [`EncoderError::InvalidEncoder`] if the knob maps to an index >= 4
    /// * [`EncoderError::I2c`] on communication failure
    async fn write_position(&mut self, knob: Knob, position: i32) -> Result<(), Self::Error> {
        let register = self.register(knob)?;
        self.driver.write_i32(&register, position).await
    }
}
