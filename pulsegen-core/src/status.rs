//! Status model handed to the display / log collaborator.

use crate::config::{AMPLITUDE_LEVELS, AMPLITUDE_MIN, SAMPLE_RESOLUTION};
use crate::fire_control::FireState;

/// Operating mode selected by the mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// Pulses are emitted back to back.
    Continuous,
    /// One pulse per arm + trigger sequence.
    SingleFire,
}

/// What caused a [`StatusPresenter::present()`] call.
///
/// Presenters may use this to redraw only the affected field; the snapshot
/// always carries the complete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusChange {
    /// First report after power-on.
    Startup,
    /// The mode switch moved; the whole screen changes.
    Mode,
    /// Armed state toggled or a pulse was fired.
    Armed,
    Amplitude,
    Period,
}

/// Everything a presenter needs to render one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub fire_state: FireState,
    /// Amplitude setting, `1..=10`.
    pub amplitude: i32,
    /// Period setting in quarter milliseconds, `4..=100`.
    pub period: i32,
}

impl StatusSnapshot {
    pub fn mode(&self) -> OutputMode {
        self.fire_state.mode()
    }

    /// `true` while single-fire mode is armed.
    pub fn armed(&self) -> bool {
        self.fire_state == FireState::Armed
    }

    /// Period in milliseconds (`setting / SAMPLE_RESOLUTION`).
    pub fn period_ms(&self) -> f32 {
        self.period as f32 / SAMPLE_RESOLUTION as f32
    }

    /// Display level for the amplitude setting.
    pub fn amplitude_level(&self) -> f32 {
        let index = (self.amplitude - AMPLITUDE_MIN).clamp(0, AMPLITUDE_LEVELS.len() as i32 - 1);
        AMPLITUDE_LEVELS[index as usize]
    }
}

/// Receives status updates from the controller.
///
/// Called synchronously after each state-changing step. Implementations
/// must return quickly: the control loop, and therefore pulse timing, waits
/// for them.
pub trait StatusPresenter {
    fn present(&mut self, status: &StatusSnapshot, change: StatusChange);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(fire_state: FireState, amplitude: i32, period: i32) -> StatusSnapshot {
        StatusSnapshot {
            fire_state,
            amplitude,
            period,
        }
    }

    #[test]
    fn period_is_shown_in_milliseconds() {
        assert_eq!(snapshot(FireState::Disabled, 10, 4).period_ms(), 1.0);
        assert_eq!(snapshot(FireState::Disabled, 10, 10).period_ms(), 2.5);
        assert_eq!(snapshot(FireState::Disabled, 10, 100).period_ms(), 25.0);
    }

    #[test]
    fn amplitude_level_follows_the_lookup() {
        assert_eq!(snapshot(FireState::Disabled, 1, 4).amplitude_level(), 1.0);
        assert_eq!(snapshot(FireState::Disabled, 7, 4).amplitude_level(), 7.0);
    }

    #[test]
    fn mode_and_armed_follow_fire_state() {
        let armed = snapshot(FireState::Armed, 10, 4);
        assert!(armed.armed());
        assert_eq!(armed.mode(), OutputMode::SingleFire);

        let continuous = snapshot(FireState::Disabled, 10, 4);
        assert!(!continuous.armed());
        assert_eq!(continuous.mode(), OutputMode::Continuous);
    }
}
