//! Hold-to-toggle debouncer for the arm and trigger buttons.
//!
//! A toggle event is produced only when the input stays active
//! continuously and is observed while the hold duration is inside the
//! accept window `[accept_min, accept_max)`. Once a hold ends, with or
//! without an event, the detector rests in [`DebouncePhase::Cooldown`] until
//! its stale threshold has passed. A button that stays pressed does not fire
//! again straight away, and a bouncing contact cannot restart the window.
//!
//! ```text
//!          active                 elapsed in window
//!  Idle ───────────▶ Holding ─────────────────────────▶ Cooldown
//!   ▲                    │        (toggle event)          ▲  │
//!   │                    │ released, window missed        │  │
//!   │                    └────────────────────────────────┘  │
//!   │          elapsed > stale, released                     │
//!   └────────────────────────────────────────────────────────┤
//!             elapsed > stale, still active ──▶ Holding ◀────┘
//! ```
//!
//! Time is injected as monotonic milliseconds, so the machine can be driven
//! in tests without real delays.

use crate::config::{ARM_STALE_MS, DEBOUNCE_ACCEPT_MAX_MS, DEBOUNCE_ACCEPT_MIN_MS, TRIGGER_STALE_MS};

/// Timing of one debounced input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceWindow {
    /// Shortest accepted hold (inclusive).
    pub accept_min_ms: u64,
    /// Longest accepted hold (exclusive).
    pub accept_max_ms: u64,
    /// Idle time after which a new hold may start.
    pub stale_ms: u64,
}

impl DebounceWindow {
    /// Window for the arm button.
    pub const ARM: DebounceWindow = DebounceWindow {
        accept_min_ms: DEBOUNCE_ACCEPT_MIN_MS,
        accept_max_ms: DEBOUNCE_ACCEPT_MAX_MS,
        stale_ms: ARM_STALE_MS,
    };

    /// Window for the trigger button. Goes stale sooner than the arm window.
    pub const TRIGGER: DebounceWindow = DebounceWindow {
        accept_min_ms: DEBOUNCE_ACCEPT_MIN_MS,
        accept_max_ms: DEBOUNCE_ACCEPT_MAX_MS,
        stale_ms: TRIGGER_STALE_MS,
    };

    fn accepts(&self, elapsed: u64) -> bool {
        elapsed >= self.accept_min_ms && elapsed < self.accept_max_ms
    }
}

/// Phase of a [`DebounceToggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebouncePhase {
    /// Ready; the next active sample starts a hold.
    Idle,
    /// Input active since the anchor; waiting for the accept window.
    Holding,
    /// A hold has ended; ignoring the input until the stale threshold has
    /// passed since the anchor.
    Cooldown,
}

/// Single-shot toggle detector for one digital input.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceToggle {
    window: DebounceWindow,
    phase: DebouncePhase,
    /// Timestamp (ms) of the last reset; hold durations and cooldowns are
    /// measured from here.
    anchor: u64,
}

impl DebounceToggle {
    pub const fn new(window: DebounceWindow) -> Self {
        Self {
            window,
            phase: DebouncePhase::Idle,
            anchor: 0,
        }
    }

    pub fn phase(&self) -> DebouncePhase {
        self.phase
    }

    /// Milliseconds since the anchor was last reset.
    pub fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.anchor)
    }

    /// Feed one sample of the input. Returns `true` exactly once per
    /// qualifying hold.
    pub fn update(&mut self, active: bool, now_ms: u64) -> bool {
        match self.phase {
            DebouncePhase::Idle => {
                if active {
                    self.start_hold(now_ms);
                }
                false
            }
            DebouncePhase::Holding => {
                if !active {
                    // Released early: the anchor stays at the press.
                    self.phase = DebouncePhase::Cooldown;
                    return false;
                }
                let elapsed = self.elapsed(now_ms);
                if self.window.accepts(elapsed) {
                    self.settle(now_ms);
                    true
                } else {
                    if elapsed >= self.window.accept_max_ms {
                        self.phase = DebouncePhase::Cooldown;
                    }
                    false
                }
            }
            DebouncePhase::Cooldown => {
                if self.elapsed(now_ms) > self.window.stale_ms {
                    if active {
                        self.start_hold(now_ms);
                    } else {
                        self.phase = DebouncePhase::Idle;
                    }
                }
                false
            }
        }
    }

    /// Enter cooldown as if a toggle had just been produced at `now_ms`.
    ///
    /// The anchor is placed just past the accept window, so
    /// [`elapsed()`](Self::elapsed) reads `accept_max + 1` immediately.
    pub fn settle(&mut self, now_ms: u64) {
        self.anchor = now_ms.saturating_sub(self.window.accept_max_ms + 1);
        self.phase = DebouncePhase::Cooldown;
    }

    /// Enter cooldown with the anchor at `now_ms`, blocking new holds for
    /// the full stale threshold.
    pub fn restart(&mut self, now_ms: u64) {
        self.anchor = now_ms;
        self.phase = DebouncePhase::Cooldown;
    }

    /// Forget any hold or cooldown in progress.
    pub fn clear(&mut self) {
        self.phase = DebouncePhase::Idle;
    }

    fn start_hold(&mut self, now_ms: u64) {
        self.anchor = now_ms;
        self.phase = DebouncePhase::Holding;
    }
}
