//! pulsegen-firmware
//!
//! Pulse generator firmware for the Raspberry Pi Pico 2. Wires the library
//! crates to real pins:
//!
//! 1. The control task owns the [`PulseGenerator`] and calls `step()` in a
//!    tight loop. Each step reads the knobs over I2C, toggles the sync
//!    output, handles the mode / arm / trigger switches and emits pulses on
//!    the PWM "DAC".
//! 2. Every status change is handed to a [`SignalPresenter`].
//! 3. The display task wakes on the signal, lays out the new screen and
//!    flushes it to the OLED while the control task waits on the bus.
//!
//! Pulse emission busy-waits on the sample clock and does not yield, so the
//! display only updates between pulses.

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{self, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pulsegen_core::config::SAMPLE_MAX;
use pulsegen_core::hal::{Clock, ControlPanel, Lamp, PanelInput, SampleSink};
use pulsegen_core::{GeneratorConfig, PulseGenerator, Sample, StatusSnapshot};
use pulsegen_display::{status_display_task, DisplayConfig, OledDriver, SignalPresenter};
use pulsegen_encoder::{KnobBoard, KnobChannels};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Shared I2C0 bus: the encoder board and the OLED both sit on it.
static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>> = StaticCell::new();

/// Latest status for the display task.
static STATUS: Signal<CriticalSectionRawMutex, StatusSnapshot> = Signal::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type SharedI2c = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>;

type Generator = PulseGenerator<
    KnobBoard<SharedI2c>,
    FrontPanel,
    EmbassyClock,
    PwmDac,
    SignalPresenter<'static, CriticalSectionRawMutex>,
>;

// ---------------------------------------------------------------------------
// Hardware adapters
// ---------------------------------------------------------------------------

/// Busy-waiting clock on the embassy time driver.
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn wait_until(&mut self, deadline: u64) {
        while Instant::now().as_micros() < deadline {}
    }
}

/// 12-bit PWM on one slice, filtered externally to an analog level.
///
/// At the default 150 MHz system clock and `top = 4095` the carrier runs at
/// about 36.6 kHz.
struct PwmDac {
    pwm: Pwm<'static>,
    config: pwm::Config,
}

impl SampleSink for PwmDac {
    fn write_sample(&mut self, sample: Sample) {
        self.config.compare_a = sample.code();
        self.pwm.set_config(&self.config);
    }
}

/// Switches, lamps and the sync output. Switches are active-low.
struct FrontPanel {
    arm: Input<'static>,
    trigger: Input<'static>,
    slow_pulse: Input<'static>,
    single_fire_mode: Input<'static>,
    armed_lamp: Output<'static>,
    fired_lamp: Output<'static>,
    sync: Output<'static>,
}

impl ControlPanel for FrontPanel {
    fn is_active(&mut self, input: PanelInput) -> bool {
        match input {
            PanelInput::Arm => self.arm.is_low(),
            PanelInput::Trigger => self.trigger.is_low(),
            PanelInput::SlowPulse => self.slow_pulse.is_low(),
            PanelInput::SingleFireMode => self.single_fire_mode.is_low(),
        }
    }

    fn set_lamp(&mut self, lamp: Lamp, lit: bool) {
        let output = match lamp {
            Lamp::Armed => &mut self.armed_lamp,
            Lamp::Fired => &mut self.fired_lamp,
        };
        output.set_level(Level::from(lit));
    }

    fn toggle_sync(&mut self) {
        self.sync.toggle();
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic display task.
#[embassy_executor::task]
async fn display_task(driver: OledDriver<SharedI2c>, config: DisplayConfig) {
    status_display_task(driver, &STATUS, config).await;
}

/// Runs the control loop forever. Encoder errors are logged and the loop
/// carries on; the knobs are re-read on the next step.
#[embassy_executor::task]
async fn control_task(mut generator: Generator) {
    if let Err(e) = generator.start().await {
        error!("Encoder sync failed: {}", Debug2Format(&e));
    }

    loop {
        if let Err(e) = generator.step().await {
            warn!("Encoder read failed: {}", Debug2Format(&e));
            // Give the bus (and the display task) a moment before retrying.
            Timer::after_millis(10).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("pulsegen-firmware starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // WAVE_OUT   → GP0   PWM slice 0 A, RC filtered
    // ARM        → GP10  active-low, pull-up
    // MODE       → GP11  active-low, pull-up (low = single fire)
    // TRIGGER    → GP12  active-low, pull-up
    // SLOW       → GP13  active-low, pull-up
    // ARMED_LED  → GP14
    // FIRED_LED  → GP15
    // SYNC_OUT   → GP16
    // I2C_SDA    → GP20
    // I2C_SCL    → GP21
    // ———————————————————————————————————————————————————————————————————————

    let mut pwm_config = pwm::Config::default();
    pwm_config.top = SAMPLE_MAX;
    pwm_config.compare_a = Sample::MIDPOINT.code();
    let dac = PwmDac {
        pwm: Pwm::new_output_a(p.PWM_SLICE0, p.PIN_0, pwm_config.clone()),
        config: pwm_config,
    };

    let panel = FrontPanel {
        arm: Input::new(p.PIN_10, Pull::Up),
        single_fire_mode: Input::new(p.PIN_11, Pull::Up),
        trigger: Input::new(p.PIN_12, Pull::Up),
        slow_pulse: Input::new(p.PIN_13, Pull::Up),
        armed_lamp: Output::new(p.PIN_14, Level::Low),
        fired_lamp: Output::new(p.PIN_15, Level::Low),
        sync: Output::new(p.PIN_16, Level::Low),
    };

    // I2C0 at 400 kHz, shared between the encoder board and the OLED.
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_async(p.I2C0, p.PIN_21, p.PIN_20, Irqs, i2c_config);
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    let knobs = KnobBoard::new(
        I2cDevice::new(i2c_bus),
        pulsegen_encoder::DEFAULT_ADDRESS,
        KnobChannels::default(),
    );
    let oled = OledDriver::new(I2cDevice::new(i2c_bus), pulsegen_display::DEFAULT_ADDRESS);

    let generator = match PulseGenerator::new(
        GeneratorConfig::default(),
        knobs,
        panel,
        EmbassyClock,
        dac,
        SignalPresenter::new(&STATUS),
    ) {
        Ok(generator) => generator,
        Err(e) => {
            error!("Invalid generator configuration: {}", e);
            return;
        }
    };

    // —— Spawn tasks ————————————————————————————————————————————————————————

    spawner.spawn(unwrap!(display_task(oled, DisplayConfig::default())));
    spawner.spawn(unwrap!(control_task(generator)));

    info!("All tasks spawned");
}
