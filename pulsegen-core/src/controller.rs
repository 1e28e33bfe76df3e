//! The pulse generator control loop.
//!
//! [`PulseGenerator`] owns every hardware seam plus all runtime state. The
//! firmware calls [`start()`](PulseGenerator::start) once and then
//! [`step()`](PulseGenerator::step) forever.

use crate::config::{GeneratorConfig, SLOW_PULSE_PAUSE_MS};
use crate::emitter::emit;
use crate::error::ConfigError;
use crate::fire_control::{FireControl, FireState};
use crate::hal::{Clock, ControlPanel, EncoderPort, Lamp, PanelInput, SampleSink};
use crate::input::InputTracker;
use crate::scaler::recompute_into;
use crate::status::{OutputMode, StatusChange, StatusPresenter, StatusSnapshot};
use crate::waveform::{Sample, WaveformTable};

/// Pulse generator controller.
///
/// Generic over its collaborators so the same loop runs on the board and in
/// host tests:
///
/// - `ENC`: the two rotary encoders
/// - `PANEL`: switches, lamps and the sync output
/// - `CLK`: monotonic time with a blocking wait
/// - `DAC`: the waveform output
/// - `UI`: status presenter (display, log)
pub struct PulseGenerator<ENC, PANEL, CLK, DAC, UI> {
    config: GeneratorConfig,
    encoders: ENC,
    panel: PANEL,
    clock: CLK,
    dac: DAC,
    presenter: UI,
    tracker: InputTracker,
    fire: FireControl,
    working: WaveformTable,
}

impl<ENC, PANEL, CLK, DAC, UI> PulseGenerator<ENC, PANEL, CLK, DAC, UI>
where
    ENC: EncoderPort,
    PANEL: ControlPanel,
    CLK: Clock,
    DAC: SampleSink,
    UI: StatusPresenter,
{
    /// Create a controller. No hardware is touched until
    /// [`start()`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`GeneratorConfig::validate()`].
    pub fn new(
        config: GeneratorConfig,
        encoders: ENC,
        panel: PANEL,
        clock: CLK,
        dac: DAC,
        presenter: UI,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            encoders,
            panel,
            clock,
            dac,
            presenter,
            tracker: InputTracker::new(config.initial_amplitude, config.initial_period),
            fire: FireControl::new(OutputMode::Continuous),
            working: WaveformTable::default(),
        })
    }

    /// Bring the outputs to a known state and report the startup status.
    ///
    /// The DAC is parked at the midpoint, both lamps are turned off, the
    /// encoders are loaded with the initial settings and the working table
    /// is computed for the initial amplitude.
    ///
    /// # Errors
    ///
    /// Returns the encoder transport error if the encoders cannot be synced.
    pub async fn start(&mut self) -> Result<(), ENC::Error> {
        self.dac.write_sample(Sample::MIDPOINT);
        self.panel.set_lamp(Lamp::Armed, false);
        self.panel.set_lamp(Lamp::Fired, false);

        self.tracker.sync(&mut self.encoders).await?;
        self.rebuild_working_table();

        let mode = self.read_mode();
        self.fire.select_mode(mode);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Pulse generator started: {} waveform, mode {}, amplitude {}, period {} ms",
            self.config.waveform.name(),
            mode,
            self.tracker.amplitude(),
            self.status().period_ms()
        );

        self.present(StatusChange::Startup);
        Ok(())
    }

    /// Run one iteration of the control loop.
    ///
    /// Order: encoders, sync output, mode switch, then either the arm and
    /// trigger inputs (single fire) or one pulse (continuous). Emission
    /// blocks until the whole pulse is out.
    ///
    /// # Errors
    ///
    /// Returns the encoder transport error. The rest of the iteration is
    /// skipped; calling `step()` again retries.
    pub async fn step(&mut self) -> Result<(), ENC::Error> {
        let changes = self.tracker.poll(&mut self.encoders).await?;
        if changes.amplitude {
            self.rebuild_working_table();
            #[cfg(feature = "defmt")]
            defmt::info!("Amplitude: {}", self.tracker.amplitude());
            self.present(StatusChange::Amplitude);
        }
        if changes.period {
            #[cfg(feature = "defmt")]
            defmt::info!("Period: {} ms", self.status().period_ms());
            self.present(StatusChange::Period);
        }

        self.panel.toggle_sync();

        let mode = self.read_mode();
        if self.fire.select_mode(mode) {
            self.panel.set_lamp(Lamp::Armed, false);
            self.panel.set_lamp(Lamp::Fired, false);
            #[cfg(feature = "defmt")]
            defmt::info!("Mode: {}", mode);
            self.present(StatusChange::Mode);
        }

        match mode {
            OutputMode::Continuous => self.run_continuous(),
            OutputMode::SingleFire => self.run_single_fire(),
        }
        Ok(())
    }

    pub fn fire_state(&self) -> FireState {
        self.fire.state()
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            fire_state: self.fire.state(),
            amplitude: self.tracker.amplitude(),
            period: self.tracker.period(),
        }
    }

    /// The scaled table the next pulse will be emitted from.
    pub fn working_table(&self) -> &WaveformTable {
        &self.working
    }

    pub fn amplitude(&self) -> i32 {
        self.tracker.amplitude()
    }

    pub fn period(&self) -> i32 {
        self.tracker.period()
    }

    pub fn encoders_mut(&mut self) -> &mut ENC {
        &mut self.encoders
    }

    pub fn panel_mut(&mut self) -> &mut PANEL {
        &mut self.panel
    }

    pub fn dac(&self) -> &DAC {
        &self.dac
    }

    pub fn presenter(&self) -> &UI {
        &self.presenter
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn run_continuous(&mut self) {
        self.emit_pulse();
        if self.panel.is_active(PanelInput::SlowPulse) {
            let deadline = self.clock.now_micros() + SLOW_PULSE_PAUSE_MS * 1000;
            self.clock.wait_until(deadline);
        }
    }

    fn run_single_fire(&mut self) {
        let now = self.clock.now_millis();

        let arm = self.panel.is_active(PanelInput::Arm);
        if let Some(state) = self.fire.poll_arm(arm, now) {
            let armed = state == FireState::Armed;
            self.panel.set_lamp(Lamp::Armed, armed);
            #[cfg(feature = "defmt")]
            defmt::info!("Armed: {}", armed);
            self.present(StatusChange::Armed);
        }

        let trigger = self.panel.is_active(PanelInput::Trigger);
        if self.fire.poll_trigger(trigger, now) {
            self.panel.set_lamp(Lamp::Fired, true);
            self.emit_pulse();

            let done = self.clock.now_millis();
            self.fire.complete_fire(done);
            self.panel.set_lamp(Lamp::Armed, false);
            #[cfg(feature = "defmt")]
            defmt::info!("Pulse fired");
            self.present(StatusChange::Armed);
        }

        let now = self.clock.now_millis();
        if self.fire.expire_fired_lamp(now) {
            self.panel.set_lamp(Lamp::Fired, false);
        }
    }

    fn emit_pulse(&mut self) {
        emit(
            &mut self.clock,
            &mut self.dac,
            &self.working,
            self.tracker.period(),
            self.config.stride,
        );
    }

    fn rebuild_working_table(&mut self) {
        recompute_into(&mut self.working, self.config.waveform.table(), self.tracker.amplitude());
    }

    fn read_mode(&mut self) -> OutputMode {
        if self.panel.is_active(PanelInput::SingleFireMode) {
            OutputMode::SingleFire
        } else {
            OutputMode::Continuous
        }
    }

    fn present(&mut self, change: StatusChange) {
        let status = self.status();
        self.presenter.present(&status, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TABLE_LEN;
    use crate::emitter::Stride;
    use crate::fakes::{FakeBusError, FakeEncoders, FakePanel, ManualClock, RecordingPresenter, RecordingSink};
    use crate::hal::Knob;
    use crate::scaler::recompute;
    use crate::waveform::Waveform;
    use embassy_futures::block_on;

    type TestGenerator = PulseGenerator<FakeEncoders, FakePanel, ManualClock, RecordingSink, RecordingPresenter>;

    const PULSE_SAMPLES: usize = 150; // ceil(600 / 4)

    fn generator(single_fire: bool) -> (TestGenerator, ManualClock) {
        let clock = ManualClock::new(10_000_000);
        let mut panel = FakePanel::default();
        panel.set(PanelInput::SingleFireMode, single_fire);

        let mut generator = PulseGenerator::new(
            GeneratorConfig::default(),
            FakeEncoders::at(0, 0),
            panel,
            clock.clone(),
            RecordingSink::default(),
            RecordingPresenter::default(),
        )
        .unwrap();
        block_on(generator.start()).unwrap();
        (generator, clock)
    }

    /// Step once with the clock at exactly `t_ms`.
    fn step_at(generator: &mut TestGenerator, clock: &ManualClock, t_ms: u64) {
        clock.set_millis(t_ms);
        block_on(generator.step()).unwrap();
    }

    /// Step every 10 ms over `[from, to)`.
    fn run(generator: &mut TestGenerator, clock: &ManualClock, from: u64, to: u64) {
        for t in (from..to).step_by(10) {
            step_at(generator, clock, t);
        }
    }

    fn pulses(generator: &TestGenerator) -> usize {
        // The first write is the startup midpoint.
        (generator.dac().samples.len() - 1) / PULSE_SAMPLES
    }

    /// Arm from Disarmed with a 250 ms hold starting at `from`.
    fn arm(generator: &mut TestGenerator, clock: &ManualClock, from: u64) {
        generator.panel_mut().set(PanelInput::Arm, true);
        run(generator, clock, from, from + 260);
        generator.panel_mut().set(PanelInput::Arm, false);
        assert_eq!(generator.fire_state(), FireState::Armed);
    }

    // ── Construction and startup ─────────────────────────────────────────

    #[test]
    fn invalid_config_is_rejected() {
        let config = GeneratorConfig {
            initial_period: 101,
            ..GeneratorConfig::default()
        };
        let result = PulseGenerator::new(
            config,
            FakeEncoders::default(),
            FakePanel::default(),
            ManualClock::default(),
            RecordingSink::default(),
            RecordingPresenter::default(),
        );
        assert!(matches!(result, Err(ConfigError::PeriodOutOfRange)));
    }

    #[test]
    fn start_parks_outputs_and_syncs_encoders() {
        let (generator, _) = generator(false);

        assert_eq!(generator.dac().samples, vec![Sample::MIDPOINT]);
        assert_eq!(generator.panel.lamp_writes, vec![(Lamp::Armed, false), (Lamp::Fired, false)]);
        assert_eq!(generator.encoders.position(Knob::Amplitude), 40);
        assert_eq!(generator.encoders.position(Knob::Period), 16);
        assert_eq!(generator.working_table(), Waveform::Biphasic.table());

        let (status, change) = *generator.presenter().last().unwrap();
        assert_eq!(change, StatusChange::Startup);
        assert_eq!(status.fire_state, FireState::Disabled);
        assert_eq!((status.amplitude, status.period), (10, 4));
    }

    #[test]
    fn start_reads_the_mode_switch() {
        let (generator, _) = generator(true);
        assert_eq!(generator.fire_state(), FireState::Disarmed);
    }

    // ── Encoder changes ──────────────────────────────────────────────────

    #[test]
    fn amplitude_change_rebuilds_the_working_table() {
        let (mut generator, clock) = generator(false);
        generator.encoders_mut().set_position(Knob::Amplitude, 5 * 4);

        step_at(&mut generator, &clock, 10_010);

        assert_eq!(generator.amplitude(), 5);
        assert_eq!(*generator.working_table(), recompute(Waveform::Biphasic.table(), 5));
        assert_eq!(generator.presenter().count(StatusChange::Amplitude), 1);

        // The pulse in the same iteration already uses the new table.
        let first = generator.dac().samples[1];
        assert_eq!(first, generator.working_table()[0]);
    }

    #[test]
    fn encoder_overshoot_is_clamped_and_written_back() {
        let (mut generator, clock) = generator(false);
        generator.encoders_mut().set_position(Knob::Amplitude, 15 * 4);
        generator.encoders_mut().set_position(Knob::Period, 2 * 4);

        step_at(&mut generator, &clock, 10_010);

        assert_eq!((generator.amplitude(), generator.period()), (10, 4));
        assert_eq!(generator.encoders_mut().position(Knob::Amplitude), 40);
        assert_eq!(generator.encoders_mut().position(Knob::Period), 16);
        assert_eq!(generator.presenter().count(StatusChange::Amplitude), 0);
        assert_eq!(generator.presenter().count(StatusChange::Period), 0);
    }

    #[test]
    fn period_change_slows_the_sample_clock() {
        let (mut generator, clock) = generator(false);
        generator.encoders_mut().set_position(Knob::Period, 63 * 4);

        clock.set_millis(10_010);
        let before = clock.now_micros();
        block_on(generator.step()).unwrap();

        assert_eq!(generator.period(), 63);
        assert_eq!(generator.presenter().last().map(|e| e.1), Some(StatusChange::Period));
        // (63 - 3) * 1000 / 600 = 100 us between the 150 writes.
        assert_eq!(clock.now_micros() - before, 149 * 100);
    }

    #[test]
    fn encoder_error_is_propagated() {
        let (mut generator, _) = generator(false);
        generator.encoders_mut().fail_reads = true;

        assert_eq!(block_on(generator.step()), Err(FakeBusError));
        assert_eq!(pulses(&generator), 0);
    }

    // ── Continuous mode ──────────────────────────────────────────────────

    #[test]
    fn continuous_mode_emits_one_pulse_per_step() {
        let (mut generator, clock) = generator(false);

        run(&mut generator, &clock, 10_010, 10_060);

        assert_eq!(pulses(&generator), 5);
        assert_eq!(generator.panel_mut().sync_toggles, 5);
    }

    #[test]
    fn full_stride_writes_the_whole_table() {
        let config = GeneratorConfig {
            stride: Stride::FULL,
            ..GeneratorConfig::default()
        };
        let mut generator = PulseGenerator::new(
            config,
            FakeEncoders::at(40, 16),
            FakePanel::default(),
            ManualClock::default(),
            RecordingSink::default(),
            RecordingPresenter::default(),
        )
        .unwrap();

        block_on(generator.step()).unwrap();

        assert_eq!(generator.dac().samples.len(), TABLE_LEN);
    }

    #[test]
    fn slow_flag_pauses_after_each_pulse() {
        let (mut generator, clock) = generator(false);
        generator.panel_mut().set(PanelInput::SlowPulse, true);

        clock.set_millis(20_000);
        block_on(generator.step()).unwrap();

        // 149 us of pulse, then 500 ms of pause.
        assert_eq!(clock.now_micros(), 20_000_000 + 149 + 500_000);
    }

    // ── Single-fire mode ─────────────────────────────────────────────────

    #[test]
    fn arm_hold_of_250ms_arms_exactly_once() {
        let (mut generator, clock) = generator(true);

        arm(&mut generator, &clock, 10_010);

        assert_eq!(generator.presenter().count(StatusChange::Armed), 1);
        assert!(generator.panel_mut().lamp(Lamp::Armed));
        assert!(generator.status().armed());
        assert_eq!(pulses(&generator), 0);
    }

    #[test]
    fn short_arm_hold_does_nothing() {
        let (mut generator, clock) = generator(true);

        generator.panel_mut().set(PanelInput::Arm, true);
        run(&mut generator, &clock, 10_010, 10_200);
        generator.panel_mut().set(PanelInput::Arm, false);
        run(&mut generator, &clock, 10_200, 10_500);

        assert_eq!(generator.fire_state(), FireState::Disarmed);
        assert_eq!(generator.presenter().count(StatusChange::Armed), 0);
    }

    #[test]
    fn trigger_fires_exactly_one_pulse() {
        let (mut generator, clock) = generator(true);
        arm(&mut generator, &clock, 10_010);

        generator.panel_mut().set(PanelInput::Trigger, true);
        run(&mut generator, &clock, 10_300, 14_000);

        assert_eq!(generator.dac().samples.len(), 1 + PULSE_SAMPLES);
        assert_eq!(generator.fire_state(), FireState::Disarmed);
        assert!(!generator.panel_mut().lamp(Lamp::Armed));
        // One event for arming, one for the pulse.
        assert_eq!(generator.presenter().count(StatusChange::Armed), 2);
    }

    #[test]
    fn trigger_while_disarmed_is_ignored() {
        let (mut generator, clock) = generator(true);

        generator.panel_mut().set(PanelInput::Trigger, true);
        run(&mut generator, &clock, 10_010, 11_000);

        assert_eq!(pulses(&generator), 0);
        assert!(!generator.panel_mut().lamp(Lamp::Fired));
    }

    #[test]
    fn fired_lamp_clears_800ms_after_the_trigger_reset() {
        let (mut generator, clock) = generator(true);
        arm(&mut generator, &clock, 10_010);

        generator.panel_mut().set(PanelInput::Trigger, true);
        step_at(&mut generator, &clock, 10_500);
        assert_eq!(pulses(&generator), 0);
        step_at(&mut generator, &clock, 10_700);
        assert_eq!(pulses(&generator), 1);
        assert!(generator.panel_mut().lamp(Lamp::Fired));

        // Fired at 10_700, so the trigger anchor is 10_399.
        step_at(&mut generator, &clock, 11_199);
        assert!(generator.panel_mut().lamp(Lamp::Fired));
        step_at(&mut generator, &clock, 11_200);
        assert!(!generator.panel_mut().lamp(Lamp::Fired));
    }

    #[test]
    fn retrigger_after_an_aborted_hold_waits_for_the_stale_window() {
        let (mut generator, clock) = generator(true);
        arm(&mut generator, &clock, 10_010);

        generator.panel_mut().set(PanelInput::Trigger, true);
        step_at(&mut generator, &clock, 10_300);
        generator.panel_mut().set(PanelInput::Trigger, false);
        step_at(&mut generator, &clock, 10_400);

        // Pressed again well inside the 2500 ms trigger window.
        generator.panel_mut().set(PanelInput::Trigger, true);
        run(&mut generator, &clock, 10_500, 12_800);
        assert_eq!(pulses(&generator), 0);
        assert_eq!(generator.fire_state(), FireState::Armed);

        // 12_810 - 10_300 > 2500: a fresh hold starts and fires 200 ms later.
        run(&mut generator, &clock, 12_800, 13_020);
        assert_eq!(pulses(&generator), 1);
    }

    // ── Mode switching ───────────────────────────────────────────────────

    #[test]
    fn mode_switch_while_armed_resets_and_clears_lamps() {
        let (mut generator, clock) = generator(true);
        arm(&mut generator, &clock, 10_010);

        generator.panel_mut().set(PanelInput::SingleFireMode, false);
        step_at(&mut generator, &clock, 10_300);

        assert_eq!(generator.fire_state(), FireState::Disabled);
        assert!(!generator.panel_mut().lamp(Lamp::Armed));
        assert_eq!(generator.presenter().last().map(|e| e.1), Some(StatusChange::Mode));
        assert_eq!(pulses(&generator), 1);

        generator.panel_mut().set(PanelInput::SingleFireMode, true);
        step_at(&mut generator, &clock, 10_310);
        assert_eq!(generator.fire_state(), FireState::Disarmed);

        // No stale pulse after switching back.
        generator.panel_mut().set(PanelInput::Trigger, true);
        run(&mut generator, &clock, 10_320, 11_000);
        assert_eq!(pulses(&generator), 1);
        assert_eq!(generator.presenter().count(StatusChange::Mode), 2);
    }
}
