//! Async knob driver for the pulse generator.
//!
//! Reads the amplitude and period knobs from an Adafruit Seesaw-based Quad
//! Rotary Encoder Breakout (Product #5752) on a shared I2C bus, and exposes
//! them to the core through its [`EncoderPort`](pulsegen_core::hal::EncoderPort)
//! trait.
//!
//! # Architecture
//!
//! - **`driver`** (crate-private): Seesaw protocol primitives that handle
//!   I2C timing, endianness and register addressing.
//! - **[`KnobBoard`]**: maps each [`Knob`](pulsegen_core::hal::Knob) to an
//!   encoder on the board and validates the mapping.
//!
//! # Features
//!
//! - **`defmt`**: [`defmt::Format`] implementations for logging.

#![no_std]

pub use error::EncoderError;
pub use knob_board::{KnobBoard, KnobChannels};
pub use registers::{DEFAULT_ADDRESS, ENCODER_COUNT};

mod driver;
mod error;
mod knob_board;
mod registers;
