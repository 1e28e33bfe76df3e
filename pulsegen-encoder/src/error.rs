//! Error types for the knob board driver.

use core::fmt;

/// Errors that can occur when talking to the encoder board.
#[derive(Debug)]
pub enum EncoderError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// A knob is mapped to an encoder index the board does not have.
    InvalidEncoder(u8),
}

impl<E> From<E> for EncoderError<E> {
    fn from(error: E) -> Self {
        EncoderError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for EncoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::I2c(e) => write!(f, "I2C error: {:?}", e),
            EncoderError::InvalidEncoder(index) => write!(f, "Invalid encoder index {} (must be 0-3)", index),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EncoderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            EncoderError::InvalidEncoder(index) => defmt::write!(f, "Invalid encoder index {}", index),
        }
    }
}
