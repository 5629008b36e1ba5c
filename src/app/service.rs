//! Application service: the arbiter.
//!
//! [`Controller`] owns the [`ControllerState`] and the three control
//! components.  It exposes a hardware-agnostic API; all I/O flows through
//! port traits injected at call sites, making the whole loop testable
//! with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────────────┐ ──▶ EventSink
//!                 │          Controller            │
//!   MotorPort ◀── │ PulseDecoder · MotorActuator · │
//!                 │ EnvironmentPolicy              │
//!                 └────────────────────────────────┘
//! ```
//!
//! ## Per-tick order
//!
//! 1. Sample sensors.
//! 2. Pulse decoder; a committed command starts the idle motor.
//! 3. Travel-time cutoff.
//! 4. Environment policy, only if the motor is idle and no pulse is pending.
//! 5. Status snapshot at its own cadence.
//!
//! Manual commands therefore always pre-empt automation for the cycle
//! they commit in.

use log::{debug, info};

use crate::config::SystemConfig;
use crate::control::environment::EnvironmentPolicy;
use crate::control::motor::MotorActuator;
use crate::control::pulse::{Commit, PulseDecoder};
use crate::control::{ControllerState, Direction, Phase};
use crate::timing::has_elapsed;

use super::commands::AppCommand;
use super::events::{AppEvent, MoveSource, StatusSnapshot, StopReason};
use super::ports::{EventSink, MotorPort, SensorPort, SensorSnapshot};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// The arbiter: one instance per motor, driven by the main loop.
pub struct Controller {
    config: SystemConfig,
    state: ControllerState,
    decoder: PulseDecoder,
    motor: MotorActuator,
    policy: EnvironmentPolicy,
    /// Phase reported after the previous tick.
    phase: Phase,
    /// Inputs sampled on the most recent tick.
    last_sample: SensorSnapshot,
    last_status_ms: u32,
    tick_count: u64,
    /// Completed motor runs (cutoff or commanded stop).
    runs: u32,
}

impl Controller {
    /// Construct the controller from configuration.
    ///
    /// Does **not** touch the hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            decoder: PulseDecoder::new(&config),
            motor: MotorActuator::new(&config),
            policy: EnvironmentPolicy::new(&config),
            config,
            state: ControllerState::new(),
            phase: Phase::Idle,
            last_sample: SensorSnapshot::default(),
            last_status_ms: 0,
            tick_count: 0,
            runs: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the motor outputs into a known de-energised state and start
    /// the status cadence at `now_ms`.
    pub fn start(&mut self, now_ms: u32, hw: &mut impl MotorPort, sink: &mut impl EventSink) {
        self.motor.stop(&mut self.state, hw);
        self.last_status_ms = now_ms;
        self.phase = self.state.phase();
        sink.emit(&AppEvent::Started(self.phase));
        info!("Controller started in {:?}", self.phase);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`MotorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + MotorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count = self.tick_count.wrapping_add(1);

        // 1. Sample
        let sample = hw.sample();
        self.last_sample = sample;

        // 2. Manual pulses
        let step = self.decoder.step(
            &mut self.state.pulses,
            sample.command_line,
            self.state.motor.is_running(),
            now_ms,
        );
        if let Some(count) = step.counted {
            sink.emit(&AppEvent::PulseCounted { count });
        }
        match step.commit {
            Some(Commit::Command(direction)) => {
                info!("Manual {} command received", direction.label());
                sink.emit(&AppEvent::ManualCommand(direction));
                self.start_motor(direction, MoveSource::Manual, now_ms, hw, sink);
            }
            Some(Commit::Discarded { count }) => {
                debug!("Pulse sequence of {} ignored", count);
                sink.emit(&AppEvent::PulsesDiscarded { count });
            }
            None => {}
        }

        // 3. Travel-time cutoff
        if self.motor.tick(&mut self.state, now_ms, hw) {
            self.runs = self.runs.wrapping_add(1);
            sink.emit(&AppEvent::MotorStopped {
                reason: StopReason::TravelTimeout,
            });
        }

        // 4. Automation
        let armed = self.state.automation_armed();
        let moves = self.policy.evaluate(
            &mut self.state.flags,
            sample.rain_raw,
            sample.light_raw,
            armed,
        );
        for mv in &moves {
            if !self.start_motor(mv.direction, MoveSource::Automatic(mv.trigger), now_ms, hw, sink)
            {
                debug!("Automated {:?} move superseded", mv.trigger);
            }
        }

        self.sync_phase(sink);

        // 5. Status
        if has_elapsed(now_ms, self.last_status_ms, self.config.status_interval_ms) {
            self.last_status_ms = now_ms;
            sink.emit(&AppEvent::Status(self.build_status()));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a host-side command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u32,
        hw: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::Retract | AppCommand::Extend => {
                let direction = if cmd == AppCommand::Retract {
                    Direction::Retract
                } else {
                    Direction::Extend
                };
                if !self.start_motor(direction, MoveSource::Command, now_ms, hw, sink) {
                    debug!("{:?} ignored, motor busy", cmd);
                }
            }
            AppCommand::Stop => {
                let was_running = self.state.motor.is_running();
                self.motor.stop(&mut self.state, hw);
                if was_running {
                    self.runs = self.runs.wrapping_add(1);
                    sink.emit(&AppEvent::MotorStopped {
                        reason: StopReason::Commanded,
                    });
                }
            }
        }
        self.sync_phase(sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a status snapshot from the most recent sample.
    pub fn build_status(&self) -> StatusSnapshot {
        StatusSnapshot {
            command_line: self.last_sample.command_line,
            motor_running: self.state.motor.is_running(),
            rain_raw: self.last_sample.rain_raw,
            light_raw: self.last_sample.light_raw,
            phase: self.phase,
            runs: self.runs,
        }
    }

    /// Current arbiter phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only view of the controller state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Completed motor runs since startup.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_motor(
        &mut self,
        direction: Direction,
        source: MoveSource,
        now_ms: u32,
        hw: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let started = self
            .motor
            .start(&mut self.state.motor, direction, now_ms, hw);
        if started {
            sink.emit(&AppEvent::MotorStarted { direction, source });
        }
        started
    }

    fn sync_phase(&mut self, sink: &mut impl EventSink) {
        let current = self.state.phase();
        if current != self.phase {
            debug!("Phase: {:?} -> {:?}", self.phase, current);
            sink.emit(&AppEvent::PhaseChanged {
                from: self.phase,
                to: current,
            });
            self.phase = current;
        }
    }
}
