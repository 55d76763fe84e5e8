//! Engine: registration ownership and public API with time math + run
//! stepping.
//!
//! Methods:
//! - new, observe, unobserve, spawn, update (fire triggers -> step runs)
//!
//! Time is a single wall-clock accumulator advanced by host-supplied dt.
//! Run progress derives from that clock, never from tick counts, so stalled
//! tick delivery (hidden tab) resumes at the correct position.

use log::debug;

use crate::config::Config;
use crate::ids::{IdAllocator, RegId, RunId};
use crate::inputs::Inputs;
use crate::outputs::{CoreEvent, Outputs};
use crate::run::{Run, RunMode, RunPhase, RunSpec};
use crate::trigger::{Registration, TriggerSet};

#[derive(Debug)]
pub struct Engine {
    // Owned data
    cfg: Config,
    ids: IdAllocator,
    triggers: TriggerSet,
    runs: Vec<Run>,

    /// Accumulated wall-clock milliseconds.
    now_ms: f64,

    // Per-tick outputs
    outputs: Outputs,
}

impl Engine {
    /// Create a new engine with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            triggers: TriggerSet::new(),
            runs: Vec::new(),
            now_ms: 0.0,
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Current engine clock in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Begin monitoring `target`. When its visible fraction first reaches
    /// `threshold`, the bound runs are scheduled and the registration is
    /// torn down; further visibility changes are ignored.
    pub fn observe(&mut self, target: &str, threshold: f32, runs: Vec<RunSpec>) -> RegId {
        let id = self.ids.alloc_reg();
        self.triggers.insert(Registration {
            id,
            target: target.to_string(),
            threshold: threshold.clamp(f32::EPSILON, 1.0),
            runs,
        });
        id
    }

    /// Cancel a registration before it fires. After the fire this is a no-op.
    pub fn unobserve(&mut self, id: RegId) {
        self.triggers.remove(id);
    }

    /// Schedule a run directly, without a visibility trigger. Used for
    /// re-playing one-shots inside a panel that is known to be visible.
    pub fn spawn(&mut self, spec: RunSpec) -> RunId {
        let id = self.ids.alloc_run();
        self.runs.push(Run::new(id, spec, self.now_ms));
        id
    }

    /// Registrations still waiting to fire.
    pub fn pending_registrations(&self) -> usize {
        self.triggers.len()
    }

    /// Runs scheduled or in flight this instant.
    pub fn live_runs(&self) -> usize {
        self.runs.len()
    }

    /// Step the engine by dt milliseconds with the given inputs.
    pub fn update(&mut self, dt_ms: f64, inputs: Inputs) -> &Outputs {
        self.outputs.clear();

        // 1) Cancellations apply before visibility, so an unobserve queued
        //    in the same tick as a matching sample wins.
        for id in inputs.cancels {
            self.triggers.remove(id);
        }

        // 2) Advance the clock.
        self.now_ms += dt_ms.max(0.0);

        // 3) Fire satisfied registrations and schedule their runs.
        for sample in &inputs.visibility {
            for reg in self
                .triggers
                .take_fired(&sample.target, sample.fraction)
            {
                debug!(
                    "trigger fired: {} at fraction {:.2}",
                    reg.target, sample.fraction
                );
                self.outputs.push_event(
                    CoreEvent::TriggerFired {
                        reg: reg.id,
                        target: reg.target.clone(),
                    },
                    self.cfg.max_events_per_tick,
                );
                for spec in reg.runs {
                    let id = self.ids.alloc_run();
                    self.runs.push(Run::new(id, spec, self.now_ms));
                }
            }
        }

        // 4) Step runs; completed runs are dropped at the end of the tick.
        let now = self.now_ms;
        let cap = self.cfg.max_events_per_tick;
        for run in &mut self.runs {
            step_run(run, now, cap, &mut self.outputs);
        }
        self.runs.retain(|r| r.phase != RunPhase::Done);

        &self.outputs
    }
}

/// Advance one run against the engine clock, emitting writes and events.
fn step_run(run: &mut Run, now_ms: f64, event_cap: usize, out: &mut Outputs) {
    if run.phase == RunPhase::Pending {
        if now_ms < run.starts_at_ms {
            return;
        }
        // Activation tick.
        out.push_event(
            CoreEvent::RunStarted {
                run: run.id,
                target: run.spec.target.clone(),
            },
            event_cap,
        );
        if run.spec.zero_state {
            out.push_write(run.spec.zero_write());
        }
        run.phase = match run.spec.mode {
            RunMode::Delegated { settle_frames } if settle_frames > 0 => RunPhase::Settling {
                frames_left: settle_frames,
            },
            RunMode::Delegated { .. } => {
                complete(run, out, event_cap);
                return;
            }
            RunMode::Driven => {
                if run.spec.duration_ms == 0 {
                    // Degenerate duration: terminal value immediately, no
                    // intermediate frames.
                    complete(run, out, event_cap);
                    return;
                }
                RunPhase::Active
            }
        };
        if run.phase == RunPhase::Active {
            drive_frame(run, now_ms, event_cap, out);
        }
        return;
    }

    match run.phase {
        RunPhase::Settling { frames_left } => {
            let left = frames_left - 1;
            if left == 0 {
                complete(run, out, event_cap);
            } else {
                run.phase = RunPhase::Settling { frames_left: left };
            }
        }
        RunPhase::Active => drive_frame(run, now_ms, event_cap, out),
        RunPhase::Pending | RunPhase::Done => {}
    }
}

fn drive_frame(run: &mut Run, now_ms: f64, event_cap: usize, out: &mut Outputs) {
    let t = ((now_ms - run.starts_at_ms) / run.spec.duration_ms as f64).clamp(0.0, 1.0);
    if t >= 1.0 {
        complete(run, out, event_cap);
    } else {
        out.push_write(run.spec.frame_write(t as f32));
    }
}

/// Terminal frame: write the exact target value and finish the run.
fn complete(run: &mut Run, out: &mut Outputs, event_cap: usize) {
    out.push_write(run.spec.terminal_write());
    out.push_event(
        CoreEvent::RunCompleted {
            run: run.id,
            target: run.spec.target.clone(),
        },
        event_cap,
    );
    run.phase = RunPhase::Done;
}
