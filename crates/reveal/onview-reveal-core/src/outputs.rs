//! Output contracts from the core engine.
//!
//! Outputs carry the element writes for this tick as a WriteBatch keyed by
//! stable string TargetHandle, and a separate list of semantic events.
//! Adapters apply writes to the host and transport events.

use serde::{Deserialize, Serialize};

use onview_api_core::{TargetHandle, WriteBatch, WriteOp};

use crate::ids::{RegId, RunId};

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    /// A registration's visibility threshold was reached. Fires at most
    /// once per registration for the lifetime of the engine.
    TriggerFired { reg: RegId, target: TargetHandle },
    RunStarted { run: RunId, target: TargetHandle },
    RunCompleted { run: RunId, target: TargetHandle },
    Error { message: String },
}

/// Outputs returned by Engine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub writes: WriteBatch,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.writes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_write(&mut self, op: WriteOp) {
        self.writes.push(op);
    }

    /// Push an event unless the per-tick cap is already reached.
    #[inline]
    pub fn push_event(&mut self, event: CoreEvent, cap: usize) {
        if self.events.len() < cap {
            self.events.push(event);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }
}
