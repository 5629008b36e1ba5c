//! Fuzz target: `PulseDecoder::step`
//!
//! Each input byte is one tick: bit 0 is the line level, bit 1 whether
//! the motor is running, bits 2..8 the tick length in ms.  Asserts that
//! only one- and two-pulse sequences ever commit a command and that the
//! window is always left clean after a commit.
//!
//! cargo fuzz run fuzz_pulse_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use clothesline::config::SystemConfig;
use clothesline::control::Direction;
use clothesline::control::pulse::{Commit, PulseDecoder, PulseWindow};

fuzz_target!(|data: &[u8]| {
    let decoder = PulseDecoder::new(&SystemConfig::default());
    let mut window = PulseWindow::new();
    let mut now: u32 = 0;

    for &byte in data {
        now = now.wrapping_add(u32::from(byte >> 2) * 10);
        let level = byte & 1 != 0;
        let running = byte & 2 != 0;

        let step = decoder.step(&mut window, level, running, now);

        if let Some(commit) = step.commit {
            assert!(!running, "commit while the motor runs");
            assert_eq!(window.pending_count, 0);
            assert!(!window.awaiting_settle);
            match commit {
                Commit::Command(Direction::Retract) | Commit::Command(Direction::Extend) => {}
                Commit::Discarded { count } => assert!(count != 1 && count != 2),
            }
        }
    }
});
