//! Error types for the status display.

use core::fmt;

use display_interface::DisplayError;

/// Errors from [`OledDriver`](crate::OledDriver).
///
/// `ssd1306` folds every bus error into [`DisplayError`], so this enum is
/// not generic over the I2C error type.
#[derive(Debug)]
pub enum OledError {
    /// Display interface error (I2C and other bus-level failures).
    Display(DisplayError),
    /// The panel did not accept the initialisation sequence.
    InitializationFailed,
    /// Drawing or flushing before [`OledDriver::init()`](crate::OledDriver::init).
    NotInitialized,
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "Display interface error: {:?}", e),
            OledError::InitializationFailed => write!(f, "Initialization failed"),
            OledError::NotInitialized => write!(f, "Not initialized"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_) => defmt::write!(f, "Display interface error"),
            OledError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(OledError::NotInitialized.to_string(), "Not initialized");
        assert_eq!(
            OledError::from(DisplayError::BusWriteError).to_string(),
            "Display interface error: BusWriteError"
        );
    }
}
