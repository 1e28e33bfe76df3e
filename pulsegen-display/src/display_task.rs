//! Display task and the signal-backed status presenter.
//!
//! The control loop must never wait for the ~20 ms I2C flush, so the two
//! sides are decoupled by an [`embassy_sync::signal::Signal`]: the
//! [`SignalPresenter`] overwrites the latest [`StatusSnapshot`] and the
//! [`status_display_task`] redraws when it wakes. Intermediate snapshots are
//! dropped; only the newest is drawn.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;
use pulsegen_core::status::{StatusChange, StatusPresenter, StatusSnapshot};

use crate::driver::OledDriver;
use crate::layout::{DisplayChanges, DisplayConfig, DisplayState};

// ── Presenter ────────────────────────────────────────────────────────────

/// [`StatusPresenter`] that hands snapshots to the display task.
///
/// `present()` never blocks; it replaces any snapshot the task has not
/// picked up yet.
pub struct SignalPresenter<'a, M: RawMutex> {
    signal: &'a Signal<M, StatusSnapshot>,
}

impl<'a, M: RawMutex> SignalPresenter<'a, M> {
    pub fn new(signal: &'a Signal<M, StatusSnapshot>) -> Self {
        Self { signal }
    }
}

impl<M: RawMutex> StatusPresenter for SignalPresenter<'_, M> {
    fn present(&mut self, status: &StatusSnapshot, _change: StatusChange) {
        self.signal.signal(*status);
    }
}

// ── Display task ─────────────────────────────────────────────────────────

/// Display update loop.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`; Embassy tasks
/// cannot be generic, so callers wrap it:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn display_task(driver: OledDriver<MyI2c>, signal: &'static StatusSignal) {
///     status_display_task(driver, signal, DisplayConfig::default()).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the panel.
/// 2. Wait for a snapshot, lay it out, and skip it if the text matches the
///    last drawn frame.
/// 3. Render and flush, then sleep for the configured update period so a
///    burst of knob turns costs at most one redraw per period.
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns** (task exits).
/// * Render / flush failure: logs the error and waits for the next snapshot.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn status_display_task<I2C, M>(
    mut driver: OledDriver<I2C>,
    signal: &Signal<M, StatusSnapshot>,
    config: DisplayConfig,
) where
    I2C: I2c,
    M: RawMutex,
{
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialised");

    let period = Duration::from_millis(config.update_period_ms());
    let mut last_state: Option<DisplayState> = None;

    loop {
        let status = signal.wait().await;
        let state = DisplayState::from_status(&status);

        if let Some(last) = &last_state {
            if !DisplayChanges::detect(last, &state).any_changed() {
                continue;
            }
        }

        if let Err(_e) = driver.draw(&state, &config) {
            #[cfg(feature = "defmt")]
            defmt::error!("Render failed: {}", _e);
            continue;
        }

        if let Err(_e) = driver.flush().await {
            #[cfg(feature = "defmt")]
            defmt::error!("Flush failed: {}", _e);
            continue;
        }

        last_state = Some(state);
        Timer::after(period).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use pulsegen_core::FireState;

    fn status(fire_state: FireState, amplitude: i32) -> StatusSnapshot {
        StatusSnapshot {
            fire_state,
            amplitude,
            period: 4,
        }
    }

    #[test]
    fn presenter_hands_over_the_latest_snapshot() {
        let signal: Signal<NoopRawMutex, StatusSnapshot> = Signal::new();
        let mut presenter = SignalPresenter::new(&signal);

        presenter.present(&status(FireState::Disabled, 3), StatusChange::Amplitude);
        presenter.present(&status(FireState::Disabled, 4), StatusChange::Amplitude);

        assert_eq!(signal.try_take(), Some(status(FireState::Disabled, 4)));
        assert_eq!(signal.try_take(), None);
    }

    #[test]
    fn presenter_signals_on_every_change_kind() {
        let signal: Signal<NoopRawMutex, StatusSnapshot> = Signal::new();
        let mut presenter = SignalPresenter::new(&signal);

        presenter.present(&status(FireState::Armed, 10), StatusChange::Armed);

        assert!(signal.signaled());
    }
}
