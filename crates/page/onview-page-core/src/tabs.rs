//! Tab group state machine.
//!
//! States are {panel 0 active, ..., panel n-1 active}; a click on panel i
//! moves to exactly "panel i active" with every sibling inactive. There is
//! no terminal state: tabs switch indefinitely, unlike the one-shot runs
//! they contain. Selection is idempotent; the writes re-assert the full
//! active/inactive partition every time, so a double click cannot leave two
//! panels active.

use onview_api_core::{TargetHandle, WriteBatch, WriteOp};

/// Runtime state for one tab group, compiled from a TabGroupSpec.
#[derive(Clone, Debug)]
pub struct TabGroup {
    pub group: String,
    pub active_class: String,
    pub buttons: Vec<TargetHandle>,
    pub panels: Vec<TargetHandle>,
    pub active: usize,
    /// Default-active panel, restored on controller reset.
    pub initial: usize,
}

impl TabGroup {
    /// Writes asserting the current selection across all pairs.
    pub fn assert_writes(&self, out: &mut WriteBatch) {
        for (i, (btn, panel)) in self.buttons.iter().zip(self.panels.iter()).enumerate() {
            if i == self.active {
                out.push(WriteOp::add_class(btn.clone(), self.active_class.clone()));
                out.push(WriteOp::add_class(panel.clone(), self.active_class.clone()));
            } else {
                out.push(WriteOp::remove_class(btn.clone(), self.active_class.clone()));
                out.push(WriteOp::remove_class(panel.clone(), self.active_class.clone()));
            }
        }
    }

    /// Switch to `panel`, returning true when the index was valid. The
    /// writes re-assert the whole partition regardless of whether the
    /// selection changed.
    pub fn select(&mut self, panel: usize, out: &mut WriteBatch) -> bool {
        if panel >= self.panels.len() {
            return false;
        }
        self.active = panel;
        self.assert_writes(out);
        true
    }

    pub fn active_panel(&self) -> Option<&TargetHandle> {
        self.panels.get(self.active)
    }
}
