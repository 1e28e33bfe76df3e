//! Status display for the pulse generator: an SSD1306 (128×64) on I2C,
//! driven from Embassy.
//!
//! This crate provides [`OledDriver`], a wrapper around the [`ssd1306`]
//! crate in async buffered-graphics mode, the [`DisplayState`] screen
//! layout, and (with the `task` feature) [`status_display_task`] plus the
//! [`SignalPresenter`] that feeds it from the control loop.
//!
//! # Quick Start
//!
//! ```ignore
//! use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
//! use pulsegen_display::{status_display_task, DisplayConfig, OledDriver, SignalPresenter};
//!
//! static STATUS: Signal<CriticalSectionRawMutex, StatusSnapshot> = Signal::new();
//!
//! // Control side: hand the presenter to the PulseGenerator.
//! let presenter = SignalPresenter::new(&STATUS);
//!
//! // Display side: a thin concrete task wrapper.
//! #[embassy_executor::task]
//! async fn display_task(driver: OledDriver<MyI2cType>) {
//!     status_display_task(driver, &STATUS, DisplayConfig::default()).await;
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`task`** *(default)*: the display task and signal presenter
//!   (pulls in `embassy-sync` and `embassy-time`).
//! - **`defmt`**: structured logging via [`defmt`].

#![no_std]

#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod layout;

// ── Re-exports for convenience ───────────────────────────────────────────

#[cfg(feature = "task")]
pub use display_task::{status_display_task, SignalPresenter};
pub use driver::{OledDriver, DEFAULT_ADDRESS};
pub use error::OledError;
pub use layout::{DisplayChanges, DisplayConfig, DisplayState};
