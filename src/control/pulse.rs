//! Pulse-count decoder for the manual-command line.
//!
//! The companion controller signals a manual command by pulsing a
//! digital line.  The decoder is polled once per tick with the current
//! line level and counts rising edges.
//!
//! ## Protocol
//!
//! | Pulses | Inter-edge gap | Then          | Command   |
//! |--------|----------------|---------------|-----------|
//! | 1      | -              | 750 ms quiet  | `Retract` |
//! | 2      | < 500 ms       | 750 ms quiet  | `Extend`  |
//! | other  | < 500 ms       | 750 ms quiet  | dropped   |
//!
//! A rising edge more than `pulse_timeout_ms` after the previous one
//! starts a new sequence at 1.  The count only commits while the motor
//! is idle; a sequence that arrives mid-travel keeps counting and waits.
//! Stopping the motor zeroes the count, so such a sequence usually ends
//! up as a [`Commit::Discarded`].  A sequence that straddles the stop
//! keeps only the edges that come after it: a double pulse whose first
//! edge lands before the cutoff and whose second lands after it decodes
//! as a single pulse (`Retract`).

use log::debug;

use super::Direction;
use crate::config::SystemConfig;
use crate::timing::{elapsed_ms, has_elapsed};

/// Edge-tracking window, owned by [`ControllerState`](super::ControllerState).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseWindow {
    /// Line level seen on the previous tick.
    pub last_level: bool,
    /// Timestamp of the most recent rising edge.
    pub last_edge_ms: u32,
    /// Rising edges counted in the current sequence.
    pub pending_count: u8,
    /// A sequence has started and has not been committed yet.
    pub awaiting_settle: bool,
}

impl PulseWindow {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result of committing a settled pulse sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// A valid command was decoded.
    Command(Direction),
    /// The sequence had no meaning (0 or 3+ pulses) and was dropped.
    Discarded { count: u8 },
}

/// What happened during one decoder step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStep {
    /// Set when a rising edge was counted; carries the running count.
    pub counted: Option<u8>,
    /// Set when the pending sequence settled this tick.
    pub commit: Option<Commit>,
}

/// Maps a settled pulse count to a command.
pub const fn command_for_count(count: u8) -> Option<Direction> {
    match count {
        1 => Some(Direction::Retract),
        2 => Some(Direction::Extend),
        _ => None,
    }
}

pub struct PulseDecoder {
    pulse_timeout_ms: u32,
    command_delay_ms: u32,
}

impl PulseDecoder {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            pulse_timeout_ms: config.pulse_timeout_ms,
            command_delay_ms: config.command_delay_ms,
        }
    }

    /// Advance the decoder by one sample of the command line.
    ///
    /// `motor_running` gates the commit: a settled sequence is held until
    /// the motor is idle.
    pub fn step(
        &self,
        window: &mut PulseWindow,
        level: bool,
        motor_running: bool,
        now_ms: u32,
    ) -> DecodeStep {
        let mut step = DecodeStep::default();

        // ── Edge detection ────────────────────────────────────
        if level != window.last_level {
            if level {
                if elapsed_ms(now_ms, window.last_edge_ms) < self.pulse_timeout_ms {
                    window.pending_count = window.pending_count.saturating_add(1);
                } else {
                    window.pending_count = 1;
                }
                debug!("Pulse count: {}", window.pending_count);

                window.last_edge_ms = now_ms;
                window.awaiting_settle = true;
                step.counted = Some(window.pending_count);
            }
            window.last_level = level;
        }

        // ── Commit after quiet period ─────────────────────────
        if window.awaiting_settle
            && !motor_running
            && has_elapsed(now_ms, window.last_edge_ms, self.command_delay_ms)
        {
            window.awaiting_settle = false;
            let count = window.pending_count;
            step.commit = Some(match command_for_count(count) {
                Some(direction) => Commit::Command(direction),
                None => Commit::Discarded { count },
            });
            window.pending_count = 0;
        }

        // ── Stale count reset ─────────────────────────────────
        if !window.awaiting_settle
            && elapsed_ms(now_ms, window.last_edge_ms) > self.pulse_timeout_ms
        {
            window.pending_count = 0;
        }

        step
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any burst of N rising edges with gaps under the timeout commits
        /// exactly once, and only counts of 1 or 2 produce a command.
        #[test]
        fn burst_commits_exactly_once(
            gaps in proptest::collection::vec(60u32..490, 0..6),
            start in 0u32..10_000,
        ) {
            let dec = PulseDecoder::new(&SystemConfig::default());
            let mut w = PulseWindow::new();

            let mut edges = vec![start + 1000];
            for g in &gaps {
                let next = *edges.last().unwrap() + g;
                edges.push(next);
            }
            let last = *edges.last().unwrap();

            let mut commits = Vec::new();
            let mut now = start;
            while now < last + 2000 {
                // 30 ms high after each edge; gaps are at least 60 ms.
                let level = edges.iter().any(|&e| now >= e && now < e + 30);
                if let Some(c) = dec.step(&mut w, level, false, now).commit {
                    commits.push(c);
                }
                now += 10;
            }

            let count = edges.len() as u8;
            prop_assert_eq!(commits.len(), 1);
            let expected = match command_for_count(count) {
                Some(d) => Commit::Command(d),
                None => Commit::Discarded { count },
            };
            prop_assert_eq!(commits[0], expected);
            prop_assert_eq!(w.pending_count, 0);
        }
    }
}
