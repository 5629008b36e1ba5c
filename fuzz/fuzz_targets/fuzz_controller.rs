//! Fuzz target: `Controller::tick`
//!
//! Each input byte is one 10 ms tick: bit 0 is the command line, bits
//! 1..4 the rain reading, bits 4..8 the light reading (each scaled to
//! 0–1023).  Asserts that the motor is never energised for longer than
//! the rotation time.
//!
//! cargo fuzz run fuzz_controller

#![no_main]

use libfuzzer_sys::fuzz_target;
use clothesline::app::events::AppEvent;
use clothesline::app::ports::{EventSink, MotorPort, SensorPort, SensorSnapshot};
use clothesline::app::service::Controller;
use clothesline::config::{ROTATION_TIME_MS, SystemConfig};
use clothesline::control::Direction;

struct Bench {
    now: u32,
    sample: SensorSnapshot,
    energised_since: Option<u32>,
}

impl SensorPort for Bench {
    fn sample(&mut self) -> SensorSnapshot {
        self.sample
    }
}

impl MotorPort for Bench {
    fn drive(&mut self, _direction: Direction, _magnitude: u8) {
        assert!(self.energised_since.is_none(), "re-driven while energised");
        self.energised_since = Some(self.now);
    }

    fn release(&mut self) {
        self.energised_since = None;
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut ctl = Controller::new(SystemConfig::default());
    let mut bench = Bench {
        now: 0,
        sample: SensorSnapshot::default(),
        energised_since: None,
    };
    ctl.start(0, &mut bench, &mut Discard);

    // Repeat the input so runs can reach the cutoff.
    for &byte in data.iter().cycle().take(data.len() * 8) {
        bench.now = bench.now.wrapping_add(10);
        bench.sample = SensorSnapshot {
            command_line: byte & 1 != 0,
            rain_raw: u16::from((byte >> 1) & 0x07) * 146,
            light_raw: u16::from(byte >> 4) * 68,
        };
        let now = bench.now;
        ctl.tick(now, &mut bench, &mut Discard);

        if let Some(since) = bench.energised_since {
            assert!(now.wrapping_sub(since) < ROTATION_TIME_MS);
        }
    }
});
