//! Low-level Seesaw protocol driver.
//!
//! Owns the I2C device and provides the 32-bit register primitives used by
//! [`KnobBoard`](crate::KnobBoard), including the mandatory delay between
//! the write and read phases.

use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;

use crate::error::EncoderError;
use crate::registers::SEESAW_DELAY_US;

pub(crate) struct SeesawDriver<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> SeesawDriver<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Write the register address, wait for the firmware, then read.
    ///
    /// Uses separate `write()` and `read()` instead of `write_read()`: a
    /// repeated start leaves the Seesaw no time to prepare the response.
    async fn write_then_read(&mut self, register: &[u8; 2], buffer: &mut [u8]) -> Result<(), EncoderError<I2C::Error>> {
        self.i2c.write(self.address, register).await?;
        Timer::after(Duration::from_micros(SEESAW_DELAY_US)).await;
        self.i2c.read(self.address, buffer).await?;
        Ok(())
    }

    /// Read a big-endian `i32` from `register`.
    pub async fn read_i32(&mut self, register: &[u8; 2]) -> Result<i32, EncoderError<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.write_then_read(register, &mut buf).await?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Write `value` big-endian to `register` in one transaction.
    pub async fn write_i32(&mut self, register: &[u8; 2], value: i32) -> Result<(), EncoderError<I2C::Error>> {
        self.i2c.write(self.address, &write_frame(register, value)).await?;
        Ok(())
    }
}

/// `[register_hi, register_lo, b3, b2, b1, b0]`
fn write_frame(register: &[u8; 2], value: i32) -> [u8; 6] {
    let mut buf = [0u8; 6];
    buf[0..2].copy_from_slice(register);
    buf[2..6].copy_from_slice(&value.to_be_bytes());
    buf
}
