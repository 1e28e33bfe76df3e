//! Hardware-independent core of a table-driven pulse generator.
//!
//! The generator plays a 600-sample waveform table out of a 12-bit analog
//! output. Two rotary encoders set the amplitude and the pulse period; a
//! mode switch selects between continuous output and a single-fire mode in
//! which one pulse is emitted per arm + trigger button sequence.
//!
//! Every physical resource sits behind a trait in [`hal`], so the whole
//! control loop runs unchanged in host tests.
//!
//! # Architecture
//!
//! ```text
//!  encoders ──▶ InputTracker ──▶ scaler ──▶ working table ──▶ emitter ──▶ DAC
//!                     │                                          ▲
//!  panel ─────▶ FireControl (arm / trigger debounce) ────────────┘
//!                     │
//!                     └──────▶ StatusPresenter (display, log)
//! ```
//!
//! [`PulseGenerator`] owns all of it. The firmware calls
//! [`start()`](PulseGenerator::start) once and then
//! [`step()`](PulseGenerator::step) in a loop.
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`](https://docs.rs/defmt)
//!   and `defmt::Format` on the public types.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod emitter;
pub mod error;
pub mod fire_control;
pub mod hal;
pub mod input;
pub mod scaler;
pub mod setting;
pub mod status;
pub mod waveform;

#[cfg(test)]
mod fakes;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use config::GeneratorConfig;
pub use controller::PulseGenerator;
pub use emitter::Stride;
pub use error::ConfigError;
pub use fire_control::FireState;
pub use hal::{Clock, ControlPanel, EncoderPort, Knob, Lamp, PanelInput, SampleSink};
pub use status::{OutputMode, StatusChange, StatusPresenter, StatusSnapshot};
pub use waveform::{Sample, Waveform, WaveformTable};
