//! End-to-end scenarios for the Controller → decoder/policy → motor
//! pipeline.
//!
//! Time advances in 10 ms steps, matching the firmware loop.  The
//! command line is driven from a list of `[start, end)` HIGH intervals.

use crate::mock_hw::{MockHardware, MockSink, MotorCall};

use clothesline::app::commands::AppCommand;
use clothesline::app::events::{AppEvent, MoveSource, StopReason};
use clothesline::app::service::Controller;
use clothesline::config::{ROTATION_TIME_MS, SystemConfig};
use clothesline::control::environment::Trigger;
use clothesline::control::{Direction, Phase};

const TICK_MS: u32 = 10;

const DAY: u16 = 300;
const NIGHT: u16 = 100;
const WET: u16 = 400;
const DRY: u16 = 800;

struct Rig {
    ctl: Controller,
    hw: MockHardware,
    sink: MockSink,
    now: u32,
}

impl Rig {
    fn new(rain: u16, light: u16) -> Self {
        Self::starting_at(0, rain, light)
    }

    fn starting_at(now: u32, rain: u16, light: u16) -> Self {
        let mut rig = Self {
            ctl: Controller::new(SystemConfig::default()),
            hw: MockHardware::new(rain, light),
            sink: MockSink::new(),
            now,
        };
        rig.ctl.start(now, &mut rig.hw, &mut rig.sink);
        rig
    }

    /// Night, dry, and the initial Nightfall retract already finished.
    fn settled_at_night() -> Self {
        let mut rig = Self::new(DRY, NIGHT);
        rig.run_to(8_000, &[]);
        assert!(!rig.hw.energised());
        rig.clear();
        rig
    }

    /// Day, dry, and the initial Daylight extend already finished.
    fn settled_by_day() -> Self {
        let mut rig = Self::new(DRY, DAY);
        rig.run_to(8_000, &[]);
        assert!(!rig.hw.energised());
        rig.clear();
        rig
    }

    fn clear(&mut self) {
        self.hw.calls.clear();
        self.sink.events.clear();
    }

    /// Tick until `until` (inclusive), holding the line HIGH inside any
    /// of `pulses`.
    fn run_to(&mut self, until: u32, pulses: &[(u32, u32)]) {
        while self.now != until {
            self.now = self.now.wrapping_add(TICK_MS);
            let now = self.now;
            self.hw.sample.command_line = pulses.iter().any(|&(s, e)| now >= s && now < e);
            self.ctl.tick(now, &mut self.hw, &mut self.sink);
        }
    }
}

// ── Manual pulse decoding ─────────────────────────────────────

#[test]
fn double_pulse_then_silence_extends_once() {
    let mut rig = Rig::settled_at_night();

    rig.run_to(9_300, &[(8_100, 8_150), (8_300, 8_350)]);

    assert_eq!(rig.hw.drives(), vec![Direction::Extend]);
    assert_eq!(rig.ctl.state().pulses.pending_count, 0);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::ManualCommand(Direction::Extend))),
        1
    );
    assert_eq!(
        rig.sink.motor_starts(),
        vec![(Direction::Extend, MoveSource::Manual)]
    );
}

#[test]
fn commit_waits_for_the_settle_delay() {
    let mut rig = Rig::settled_at_night();

    // Last edge at 8_300; nothing may start before 8_300 + 750.
    rig.run_to(9_040, &[(8_100, 8_150), (8_300, 8_350)]);
    assert!(rig.hw.drives().is_empty());
    assert_eq!(rig.ctl.phase(), Phase::AwaitingPulseSettle);

    rig.run_to(9_050, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Extend]);
    assert_eq!(rig.ctl.phase(), Phase::Running);
}

#[test]
fn single_pulse_retracts() {
    let mut rig = Rig::settled_by_day();

    rig.run_to(9_500, &[(8_100, 8_200)]);

    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);
}

#[test]
fn three_pulses_are_ignored() {
    let mut rig = Rig::settled_at_night();

    rig.run_to(10_000, &[(8_100, 8_150), (8_300, 8_350), (8_500, 8_550)]);

    assert!(rig.hw.drives().is_empty());
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::PulsesDiscarded { count: 3 }),
        1
    );
    assert_eq!(rig.ctl.state().pulses.pending_count, 0);
}

#[test]
fn slow_second_pulse_restarts_the_count() {
    let mut rig = Rig::settled_at_night();

    // 600 ms between rising edges exceeds the 500 ms timeout, but the
    // first pulse has not settled yet either (750 ms).
    rig.run_to(10_000, &[(8_100, 8_150), (8_700, 8_750)]);

    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);
}

// ── Pulses during travel ──────────────────────────────────────

#[test]
fn pulse_mid_travel_is_counted_but_never_starts() {
    let mut rig = Rig::new(DRY, NIGHT);
    rig.run_to(1_000, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);

    rig.run_to(6_990, &[(2_000, 2_050)]);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::PulseCounted { count: 1 }),
        1
    );
    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);
    assert_eq!(rig.ctl.phase(), Phase::Running);

    // The cutoff stop clears the held count, so nothing follows it.
    rig.run_to(9_000, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::PulsesDiscarded { count: 0 }),
        1
    );

    // A fresh sequence after the stop decodes normally.
    rig.run_to(11_000, &[(9_100, 9_150), (9_300, 9_350)]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract, Direction::Extend]);
}

#[test]
fn double_pulse_straddling_the_cutoff_decodes_as_retract() {
    let mut rig = Rig::new(DRY, NIGHT);
    rig.run_to(1_000, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);

    // Cutoff at 7_010 falls between the two rising edges.
    rig.run_to(9_000, &[(6_900, 6_950), (7_100, 7_150)]);

    assert_eq!(
        rig.sink.motor_starts(),
        vec![
            (Direction::Retract, MoveSource::Automatic(Trigger::Nightfall)),
            (Direction::Retract, MoveSource::Manual),
        ]
    );
}

#[test]
fn explicit_stop_clears_pending_pulses() {
    let mut rig = Rig::new(DRY, NIGHT);
    rig.run_to(2_100, &[(2_000, 2_050)]);
    assert_eq!(rig.ctl.state().pulses.pending_count, 1);

    rig.ctl
        .handle_command(AppCommand::Stop, rig.now, &mut rig.hw, &mut rig.sink);

    assert_eq!(rig.ctl.state().pulses.pending_count, 0);
    assert_eq!(rig.hw.calls.last(), Some(&MotorCall::Release));
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::MotorStopped { reason: StopReason::Commanded }),
        1
    );
    assert_eq!(rig.ctl.runs(), 1);
}

// ── Travel-time bound ─────────────────────────────────────────

#[test]
fn motor_is_released_at_the_rotation_time() {
    let mut rig = Rig::new(DRY, DAY);
    rig.run_to(10, &[]);
    assert_eq!(
        rig.hw.calls.last(),
        Some(&MotorCall::Drive { direction: Direction::Extend, magnitude: 255 })
    );

    rig.run_to(10 + ROTATION_TIME_MS - TICK_MS, &[]);
    assert!(rig.hw.energised());

    rig.run_to(10 + ROTATION_TIME_MS, &[]);
    assert!(!rig.hw.energised());
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::MotorStopped { reason: StopReason::TravelTimeout }),
        1
    );
    assert_eq!(rig.ctl.runs(), 1);
}

#[test]
fn cutoff_survives_counter_wraparound() {
    let start = u32::MAX - 2_999;
    let mut rig = Rig::starting_at(start, DRY, NIGHT);

    let started = start.wrapping_add(TICK_MS);
    rig.run_to(started, &[]);
    assert!(rig.hw.energised());

    rig.run_to(started.wrapping_add(ROTATION_TIME_MS - TICK_MS), &[]);
    assert!(rig.hw.energised());

    rig.run_to(started.wrapping_add(ROTATION_TIME_MS), &[]);
    assert!(!rig.hw.energised());
}

#[test]
fn commanded_start_is_still_bounded() {
    let mut rig = Rig::settled_at_night();

    rig.ctl
        .handle_command(AppCommand::Extend, rig.now, &mut rig.hw, &mut rig.sink);
    let started = rig.now;
    assert_eq!(
        rig.sink.motor_starts(),
        vec![(Direction::Extend, MoveSource::Command)]
    );

    rig.run_to(started + ROTATION_TIME_MS, &[]);
    assert!(!rig.hw.energised());
}

#[test]
fn commands_while_running_are_ignored() {
    let mut rig = Rig::new(DRY, NIGHT);
    rig.run_to(100, &[]);

    rig.ctl
        .handle_command(AppCommand::Extend, rig.now, &mut rig.hw, &mut rig.sink);

    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);
}

// ── Environment automation ────────────────────────────────────

#[test]
fn rain_during_the_day_retracts_once_then_extends_when_dry() {
    let mut rig = Rig::settled_by_day();

    rig.hw.sample.rain_raw = WET;
    rig.run_to(20_000, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);
    assert_eq!(
        rig.sink.motor_starts(),
        vec![(Direction::Retract, MoveSource::Automatic(Trigger::RainStarted))]
    );

    rig.hw.sample.rain_raw = DRY;
    rig.run_to(30_000, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract, Direction::Extend]);
    assert_eq!(
        rig.sink.motor_starts()[1],
        (Direction::Extend, MoveSource::Automatic(Trigger::RainStopped))
    );
}

#[test]
fn night_retracts_once_and_rearms_after_daylight() {
    let mut rig = Rig::new(DRY, NIGHT);
    rig.run_to(20_000, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract]);

    rig.hw.sample.light_raw = DAY;
    rig.run_to(30_000, &[]);
    assert_eq!(rig.hw.drives(), vec![Direction::Retract, Direction::Extend]);

    rig.hw.sample.light_raw = NIGHT;
    rig.run_to(40_000, &[]);
    assert_eq!(
        rig.hw.drives(),
        vec![Direction::Retract, Direction::Extend, Direction::Retract]
    );
}

#[test]
fn flickering_light_inside_one_condition_does_not_retrigger() {
    let mut rig = Rig::settled_at_night();

    for light in [0, 150, 200, 50, 199] {
        rig.hw.sample.light_raw = light;
        let until = rig.now + 1_000;
        rig.run_to(until, &[]);
    }

    assert!(rig.hw.drives().is_empty());
}

#[test]
fn manual_command_pre_empts_automation() {
    let mut rig = Rig::settled_by_day();

    // Night falls on the same tick the pulse arrives: the pending count
    // disarms automation until the manual command has run.
    rig.run_to(8_090, &[]);
    rig.hw.sample.light_raw = NIGHT;
    rig.run_to(8_840, &[(8_100, 8_150)]);
    assert!(rig.hw.drives().is_empty());

    rig.run_to(8_850, &[]);
    assert_eq!(
        rig.sink.motor_starts(),
        vec![(Direction::Retract, MoveSource::Manual)]
    );

    // Nightfall is only acted on once the manual run has ended.
    rig.run_to(8_850 + ROTATION_TIME_MS, &[]);
    assert_eq!(
        rig.sink.motor_starts(),
        vec![
            (Direction::Retract, MoveSource::Manual),
            (Direction::Retract, MoveSource::Automatic(Trigger::Nightfall)),
        ]
    );
}

// ── Status reporting ──────────────────────────────────────────

#[test]
fn status_reports_phase_and_runs() {
    let mut rig = Rig::new(DRY, NIGHT);
    rig.run_to(8_000, &[]);

    let last = rig
        .sink
        .events
        .iter()
        .rev()
        .find_map(|e| match e {
            AppEvent::Status(s) => Some(*s),
            _ => None,
        })
        .expect("status emitted");

    assert_eq!(last.phase, Phase::Idle);
    assert_eq!(last.runs, 1);
    assert!(!last.motor_running);
    assert_eq!((last.rain_raw, last.light_raw), (DRY, NIGHT));
    assert!(last.line().starts_with("STATUS | cmd=0 | motor=stopped | rain=800 | light=100"));
}
