//! Clothesline Firmware: Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter          LogEventSink    UptimeClock    │
//! │  (SensorPort+MotorPort)   (EventSink)     (ms clock)     │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ─────────────         │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │          Controller (pure logic)               │      │
//! │  │  PulseDecoder · MotorActuator · Environment    │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  10 ms control loop · Task watchdog                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use clothesline::adapters::hardware::HardwareAdapter;
use clothesline::adapters::log_sink::LogEventSink;
use clothesline::adapters::time::UptimeClock;
use clothesline::app::service::Controller;
use clothesline::config::SystemConfig;
use clothesline::drivers::hw_init::{self, Adc1Channel, GpioInput, GpioOutput, LedcPwm};
use clothesline::drivers::motor::HBridgeMotor;
use clothesline::drivers::watchdog::Watchdog;
use clothesline::pins;
use clothesline::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Clothesline v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        return Err(e.into());
    }
    let watchdog = Watchdog::new();

    // ── 3. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    info!(
        "Config: rain<{} light>{} travel={}ms speed={}",
        config.rain_threshold, config.light_threshold, config.rotation_time_ms, config.motor_speed
    );
    let loop_interval_ms = config.loop_interval_ms;

    // ── 4. Adapters ───────────────────────────────────────────
    let sensor_hub = SensorHub::new(
        GpioInput::command_line(),
        Adc1Channel::rain(),
        Adc1Channel::light(),
    );
    let motor = HBridgeMotor::new(
        LedcPwm::motor_enable(),
        GpioOutput::new(pins::MOTOR_IN1_GPIO),
        GpioOutput::new(pins::MOTOR_IN2_GPIO),
    );
    let mut hw = HardwareAdapter::new(sensor_hub, motor);
    let mut sink = LogEventSink::new();
    let clock = UptimeClock::new();

    // ── 5. Control loop ───────────────────────────────────────
    let mut controller = Controller::new(config);
    controller.start(clock.now_ms(), &mut hw, &mut sink);

    loop {
        controller.tick(clock.now_ms(), &mut hw, &mut sink);
        watchdog.feed();
        esp_idf_hal::delay::FreeRtos::delay_ms(loop_interval_ms);
    }
}
