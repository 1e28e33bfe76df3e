//! Single-fire arming logic.
//!
//! [`FireControl`] owns the arm and trigger debouncers and the current
//! [`FireState`]. It decides *when* to fire; the controller does the actual
//! emission and drives the lamps.

use crate::config::FIRED_LAMP_CLEAR_MS;
use crate::debounce::{DebounceToggle, DebounceWindow};
use crate::status::OutputMode;

/// Output state of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FireState {
    /// Continuous mode; the arm and trigger inputs are ignored.
    Disabled,
    /// Single-fire mode, waiting for the arm button.
    Disarmed,
    /// Single-fire mode, the next trigger hold fires one pulse.
    Armed,
    /// A pulse is being emitted. Collapses to `Disarmed` once it is out.
    Firing,
}

impl FireState {
    /// Initial state for `mode`.
    pub const fn entry(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Continuous => FireState::Disabled,
            OutputMode::SingleFire => FireState::Disarmed,
        }
    }

    pub const fn mode(self) -> OutputMode {
        match self {
            FireState::Disabled => OutputMode::Continuous,
            _ => OutputMode::SingleFire,
        }
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FireControl {
    state: FireState,
    arm: DebounceToggle,
    trigger: DebounceToggle,
    fired_lamp: bool,
}

impl FireControl {
    pub const fn new(mode: OutputMode) -> Self {
        Self {
            state: FireState::entry(mode),
            arm: DebounceToggle::new(DebounceWindow::ARM),
            trigger: DebounceToggle::new(DebounceWindow::TRIGGER),
            fired_lamp: false,
        }
    }

    pub fn state(&self) -> FireState {
        self.state
    }

    pub fn mode(&self) -> OutputMode {
        self.state.mode()
    }

    /// Whether the fired lamp should currently be lit.
    pub fn fired_lamp(&self) -> bool {
        self.fired_lamp
    }

    /// Follow the mode switch. Returns `true` if the mode changed, in which
    /// case the state is reset, both debouncers are cleared and the fired
    /// lamp is released. The caller turns both lamps off.
    pub fn select_mode(&mut self, mode: OutputMode) -> bool {
        if mode == self.mode() {
            return false;
        }
        self.state = FireState::entry(mode);
        self.arm.clear();
        self.trigger.clear();
        self.fired_lamp = false;
        true
    }

    /// Feed the arm input. Returns the new state if it toggled.
    pub fn poll_arm(&mut self, active: bool, now_ms: u64) -> Option<FireState> {
        if !self.arm.update(active, now_ms) {
            return None;
        }
        self.state = match self.state {
            FireState::Disarmed => FireState::Armed,
            FireState::Armed => FireState::Disarmed,
            other => other,
        };
        Some(self.state)
    }

    /// Feed the trigger input. The input only counts while armed.
    ///
    /// Returns `true` when a pulse must be fired; the state is then
    /// [`FireState::Firing`] and the fired lamp is set. Call
    /// [`complete_fire()`](Self::complete_fire) once the pulse is out.
    pub fn poll_trigger(&mut self, active: bool, now_ms: u64) -> bool {
        let armed = self.state == FireState::Armed;
        if !self.trigger.update(active && armed, now_ms) {
            return false;
        }
        self.state = FireState::Firing;
        self.fired_lamp = true;
        true
    }

    /// Return to `Disarmed` after a pulse. The trigger debouncer is settled
    /// and the arm debouncer restarted, so neither can toggle again until
    /// its stale threshold has passed.
    pub fn complete_fire(&mut self, now_ms: u64) {
        self.state = FireState::Disarmed;
        self.trigger.settle(now_ms);
        self.arm.restart(now_ms);
    }

    /// Returns `true` once, when the fired lamp should turn off.
    pub fn expire_fired_lamp(&mut self, now_ms: u64) -> bool {
        if self.fired_lamp && self.trigger.elapsed(now_ms) > FIRED_LAMP_CLEAR_MS {
            self.fired_lamp = false;
            return true;
        }
        false
    }
}
