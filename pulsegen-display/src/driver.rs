//! SSD1306 driver in async buffered-graphics mode.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use ssd1306::{mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async};

use crate::error::OledError;
use crate::layout::{render_display, DisplayConfig, DisplayState};

/// Default I2C address of 128×64 SSD1306 modules.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

type Display<I2C> = Ssd1306Async<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsModeAsync<DisplaySize128x64>>;

/// Async driver for the status display.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`]: no I2C traffic.
/// 2. [`OledDriver::init()`]: sends the SSD1306 initialisation sequence.
/// 3. [`OledDriver::draw()`]: renders a frame into the buffer.
/// 4. [`OledDriver::flush()`]: transfers the buffer (~20 ms at 400 kHz).
///
/// # Example
///
/// ```no_run
/// use pulsegen_display::{DisplayConfig, DisplayState, OledDriver, DEFAULT_ADDRESS};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c, state: DisplayState) {
/// let mut oled = OledDriver::new(i2c, DEFAULT_ADDRESS);
/// oled.init().await.unwrap();
/// oled.draw(&state, &DisplayConfig::default()).unwrap();
/// oled.flush().await.unwrap();
/// # }
/// ```
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    initialized: bool,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display =
            Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0).into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
        }
    }

    /// # Errors
    ///
    /// Returns [`OledError::InitializationFailed`] if the display does not
    /// respond.
    pub async fn init(&mut self) -> Result<(), OledError> {
        self.display.init().await.map_err(|_| OledError::InitializationFailed)?;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Clear the frame buffer and render `state` into it. No I2C traffic.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] before [`init()`](Self::init).
    pub fn draw(&mut self, state: &DisplayState, config: &DisplayConfig) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.clear_buffer();
        render_display(&mut self.display, state, config)?;
        Ok(())
    }

    /// Transfer the frame buffer to the panel.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] before [`init()`](Self::init),
    /// or [`OledError::Display`] on a bus failure.
    pub async fn flush(&mut self) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.flush().await?;
        Ok(())
    }
}
