//! Screen layout and rendering.
//!
//! A [`DisplayState`] is the text of one frame, built from a
//! [`StatusSnapshot`]. [`render_display`] draws it with `embedded-graphics`.
//! Keeping the text separate from the pixels lets the update task skip
//! frames whose text did not change.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Alignment, Text},
};
use heapless::String;
use pulsegen_core::status::{OutputMode, StatusSnapshot};

/// Bytes per line buffer: 21 characters of `FONT_6X10` fill 128 px, plus a
/// terminating null.
pub const LINE_LEN: usize = 22;

/// Number of text rows under the header.
pub const ROW_COUNT: usize = 2;

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Refresh rate and layout geometry.
///
/// [`DisplayConfig::default()`] fits a 128×64 panel with `FONT_6X10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Maximum redraw rate in Hz. Default: 20.
    pub update_frequency_hz: u32,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Total display width in pixels. Default: 128.
    pub display_width: u32,
    /// Total display height in pixels. Default: 64.
    pub display_height: u32,
    /// Height reserved for the mode header at the top. Default: 12.
    pub header_height: u32,
    /// Left margin of the rows in pixels. Default: 2.
    pub row_x: i32,
    /// Baseline (pixels from top) of each row. Default: 30 and 46.
    pub row_y: [i32; ROW_COUNT],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 20,
            display_width: 128,
            display_height: 64,
            header_height: 12,
            row_x: 2,
            row_y: [30, 46],
        }
    }
}

impl DisplayConfig {
    /// Minimum time between redraws in milliseconds: `1000 / update_frequency_hz`.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz.max(1) as u64
    }
}

// ── DisplayState ─────────────────────────────────────────────────────────

/// Text of one frame, stored as null-padded UTF-8 lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub header: [u8; LINE_LEN],
    pub rows: [[u8; LINE_LEN]; ROW_COUNT],
}

impl DisplayState {
    /// Lay out the screen for the current mode.
    ///
    /// Continuous:
    ///
    /// ```text
    ///       Continuous
    /// Period: 1.00
    /// Amplitude: 10.00
    /// ```
    ///
    /// Single fire:
    ///
    /// ```text
    ///    Single Fire Mode
    /// Armed: Yes
    /// Period: 1.00
    /// ```
    pub fn from_status(status: &StatusSnapshot) -> Self {
        let mut state = Self::default();
        let mut line: String<LINE_LEN> = String::new();

        match status.mode() {
            OutputMode::Continuous => {
                copy_line(&mut state.header, "Continuous");

                // Writes only fail on overflow, which truncates the line.
                let _ = write!(line, "Period: {:.2}", status.period_ms());
                copy_line(&mut state.rows[0], &line);

                line.clear();
                let _ = write!(line, "Amplitude: {:.2}", status.amplitude_level());
                copy_line(&mut state.rows[1], &line);
            }
            OutputMode::SingleFire => {
                copy_line(&mut state.header, "Single Fire Mode");

                let armed = if status.armed() { "Yes" } else { "No" };
                let _ = write!(line, "Armed: {}", armed);
                copy_line(&mut state.rows[0], &line);

                line.clear();
                let _ = write!(line, "Period: {:.2}", status.period_ms());
                copy_line(&mut state.rows[1], &line);
            }
        }

        state
    }

    /// Convert a null-padded line back to a `&str`.
    ///
    /// Stops at the first null byte. Returns `""` if the bytes are not valid
    /// UTF-8.
    pub fn bytes_to_str(bytes: &[u8]) -> &str {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        core::str::from_utf8(&bytes[..end]).unwrap_or("")
    }

    pub fn header_str(&self) -> &str {
        Self::bytes_to_str(&self.header)
    }

    pub fn row_str(&self, row: usize) -> &str {
        Self::bytes_to_str(&self.rows[row])
    }
}

/// Copy `text` into `line`, truncating to `LINE_LEN - 1` bytes.
fn copy_line(line: &mut [u8; LINE_LEN], text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(LINE_LEN - 1);
    line[..len].copy_from_slice(&bytes[..len]);
}

// ── DisplayChanges ───────────────────────────────────────────────────────

/// Which lines differ between two [`DisplayState`] snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayChanges {
    pub header_changed: bool,
    pub row_changed: [bool; ROW_COUNT],
}

impl DisplayChanges {
    pub fn detect(old: &DisplayState, new: &DisplayState) -> Self {
        let mut row_changed = [false; ROW_COUNT];
        for (i, changed) in row_changed.iter_mut().enumerate() {
            *changed = old.rows[i] != new.rows[i];
        }

        Self {
            header_changed: old.header != new.header,
            row_changed,
        }
    }

    /// Returns `true` if any line changed.
    pub fn any_changed(&self) -> bool {
        self.header_changed || self.row_changed.iter().any(|&c| c)
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Draw `state` into `display`. Does not clear first.
///
/// ```text
/// ┌──────────────────────────────┐
/// │       HEADER (centred)       │  ← header_height
/// │ Row 0                        │  ← row_y[0]
/// │ Row 1                        │  ← row_y[1]
/// └──────────────────────────────┘
/// ```
///
/// # Example
///
/// ```no_run
/// # use pulsegen_core::{FireState, StatusSnapshot};
/// # use pulsegen_display::layout::{render_display, DisplayConfig, DisplayState};
/// # fn example(display: &mut impl embedded_graphics::draw_target::DrawTarget<Color = embedded_graphics::pixelcolor::BinaryColor>) {
/// let status = StatusSnapshot { fire_state: FireState::Armed, amplitude: 10, period: 4 };
/// let state = DisplayState::from_status(&status);
/// render_display(display, &state, &DisplayConfig::default()).ok();
/// # }
/// ```
pub fn render_display<D>(display: &mut D, state: &DisplayState, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    let header = state.header_str();
    if !header.is_empty() {
        let centre_x = config.display_width as i32 / 2;
        let y = config.header_height as i32 - 1;
        Text::with_alignment(header, Point::new(centre_x, y), text_style, Alignment::Center).draw(display)?;
    }

    for (i, &y) in config.row_y.iter().enumerate() {
        let row = state.row_str(i);
        if !row.is_empty() {
            Text::with_alignment(row, Point::new(config.row_x, y), text_style, Alignment::Left).draw(display)?;
        }
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────
