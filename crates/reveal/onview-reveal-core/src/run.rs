//! One-shot animation runs.
//!
//! A run carries one element property from a start value to a terminal value
//! exactly once. Two modes share the contract:
//! - `Driven`: the engine interpolates and emits a write every tick.
//! - `Delegated`: the engine only flips the terminal value after a short
//!   settle period; an external transition performs the interpolation.
//!
//! Progress is computed from accumulated wall-clock time, not tick count, so
//! a run that receives no ticks for a while (hidden tab, stalled frames)
//! resumes at the correct position instead of drifting.

use serde::{Deserialize, Serialize};

use onview_api_core::{DomWrite, TargetHandle, WriteOp};

use crate::easing::Easing;
use crate::ids::RunId;

/// Who performs the interpolation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunMode {
    /// The engine writes an interpolated value every tick.
    Driven,
    /// The engine writes the terminal value once, after `settle_frames`
    /// ticks, and an external transition animates toward it.
    Delegated { settle_frames: u8 },
}

/// Numeric-to-text formatting for frame and terminal writes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueFormat {
    /// 0 renders rounded integers; otherwise fixed-point with this many digits.
    #[serde(default)]
    pub decimals: u8,
    /// Appended verbatim ("%", "M", "px").
    #[serde(default)]
    pub suffix: String,
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self {
            decimals: 0,
            suffix: String::new(),
        }
    }
}

impl ValueFormat {
    pub fn integer() -> Self {
        Self::default()
    }

    pub fn with_suffix(suffix: &str) -> Self {
        Self {
            decimals: 0,
            suffix: suffix.to_string(),
        }
    }

    pub fn render(&self, value: f32) -> String {
        if self.decimals == 0 {
            format!("{}{}", value.round() as i64, self.suffix)
        } else {
            format!("{:.*}{}", self.decimals as usize, value, self.suffix)
        }
    }
}

/// Where a run's value lands on the element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sink", rename_all = "snake_case")]
pub enum FrameSink {
    /// Write the formatted value as text content (counters).
    Text { format: ValueFormat },
    /// Write the formatted value into an inline style property
    /// (heights, widths, stroke-dashoffset).
    Style { name: String, format: ValueFormat },
    /// Write the formatted value into an attribute.
    Attr { name: String, format: ValueFormat },
    /// Terminal-state class flip (reveals). No intermediate frames.
    Class { class: String },
}

impl FrameSink {
    fn write_value(&self, target: &TargetHandle, value: f32) -> WriteOp {
        match self {
            FrameSink::Text { format } => WriteOp::set_text(target.clone(), format.render(value)),
            FrameSink::Style { name, format } => {
                WriteOp::set_style(target.clone(), name.clone(), format.render(value))
            }
            FrameSink::Attr { name, format } => {
                WriteOp::set_attr(target.clone(), name.clone(), format.render(value))
            }
            FrameSink::Class { class } => WriteOp::new(
                target.clone(),
                DomWrite::AddClass {
                    class: class.clone(),
                },
            ),
        }
    }
}

/// Everything needed to play one run. Serializable so page specs and hosts
/// can describe runs declaratively.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub target: TargetHandle,
    #[serde(default)]
    pub from: f32,
    pub to: f32,
    pub duration_ms: u32,
    /// Offset from trigger fire, for stagger: pending_index * step.
    #[serde(default)]
    pub delay_ms: u32,
    #[serde(default)]
    pub easing: Easing,
    #[serde(flatten)]
    pub mode: RunMode,
    #[serde(flatten)]
    pub sink: FrameSink,
    /// Re-assert the start state on activation. Used when the element may
    /// have been reset by being hidden (tab panels) or when the start state
    /// was never written (horizontal bars).
    #[serde(default)]
    pub zero_state: bool,
}

impl RunSpec {
    /// The write that puts the element into its pre-animation state.
    pub fn zero_write(&self) -> WriteOp {
        match &self.sink {
            FrameSink::Class { class } => WriteOp::remove_class(self.target.clone(), class.clone()),
            sink => sink.write_value(&self.target, self.from),
        }
    }

    /// The exact terminal write. Never the eased approximation: emitting
    /// `to` verbatim avoids floating-point short-fall on the last frame.
    pub fn terminal_write(&self) -> WriteOp {
        self.sink.write_value(&self.target, self.to)
    }

    /// An interpolated frame write at eased progress `t` in [0,1].
    pub fn frame_write(&self, t: f32) -> WriteOp {
        let eased = self.easing.apply(t);
        let value = self.from + eased * (self.to - self.from);
        self.sink.write_value(&self.target, value)
    }
}

/// Lifecycle of a scheduled run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum RunPhase {
    /// Waiting for its start time (stagger delay).
    Pending,
    /// Delegated: counting down settle ticks before the terminal flip.
    Settling { frames_left: u8 },
    /// Driven: interpolating each tick.
    Active,
    /// Terminal write emitted; the run is dropped after this tick.
    Done,
}

/// Ephemeral per-firing state. Created when a trigger fires (or a run is
/// spawned directly), destroyed once the terminal write is out.
#[derive(Clone, Debug)]
pub(crate) struct Run {
    pub id: RunId,
    pub spec: RunSpec,
    /// Engine-clock instant the run leaves Pending (fire time + delay).
    pub starts_at_ms: f64,
    pub phase: RunPhase,
}

impl Run {
    pub fn new(id: RunId, spec: RunSpec, fired_at_ms: f64) -> Self {
        let starts_at_ms = fired_at_ms + spec.delay_ms as f64;
        Self {
            id,
            spec,
            starts_at_ms,
            phase: RunPhase::Pending,
        }
    }
}
