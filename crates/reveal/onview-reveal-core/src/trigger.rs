//! Visibility trigger registrations.
//!
//! Each registration relates one observed element to the runs that should
//! play when it first becomes sufficiently visible. Firing is exactly-once:
//! the registration is removed from the table the moment it fires, so later
//! visibility changes for the same element are ignored by construction
//! rather than by flag-checking.
//!
//! Choose observation targets whose full bounding box can plausibly reach
//! the configured fraction inside the viewport. A section taller than the
//! viewport can never satisfy a 0.3 ratio, so a registration against it
//! would sit unfired forever; observe the small element inside it instead.

use serde::{Deserialize, Serialize};

use onview_api_core::TargetHandle;

use crate::ids::RegId;
use crate::run::RunSpec;

/// One observed element and the runs bound to its first visibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegId,
    pub target: TargetHandle,
    /// Visible fraction of the element's box that fires the trigger, in (0, 1].
    pub threshold: f32,
    pub runs: Vec<RunSpec>,
}

/// Registration table. Lookup is by observed target handle; several
/// registrations may watch the same handle and each fires independently.
#[derive(Default, Debug)]
pub struct TriggerSet {
    regs: Vec<Registration>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reg: Registration) {
        self.regs.push(reg);
    }

    /// Remove a registration before it fires; the only cancellation path.
    /// Removing an already-fired (hence absent) id is a no-op.
    pub fn remove(&mut self, id: RegId) {
        self.regs.retain(|r| r.id != id);
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.regs.iter()
    }

    /// Extract every registration satisfied by `fraction` of `target` being
    /// visible. Extracted registrations are gone from the table: this is the
    /// false->true transition of the fired flag, and it cannot reverse.
    pub fn take_fired(&mut self, target: &str, fraction: f32) -> Vec<Registration> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.regs.len() {
            if self.regs[i].target == target && fraction >= self.regs[i].threshold {
                fired.push(self.regs.remove(i));
            } else {
                i += 1;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::run::{FrameSink, RunMode, RunSpec, ValueFormat};

    fn reg(id: u32, target: &str, threshold: f32) -> Registration {
        Registration {
            id: RegId(id),
            target: target.into(),
            threshold,
            runs: vec![RunSpec {
                target: target.into(),
                from: 0.0,
                to: 1.0,
                duration_ms: 100,
                delay_ms: 0,
                easing: Easing::Linear,
                mode: RunMode::Driven,
                sink: FrameSink::Text {
                    format: ValueFormat::integer(),
                },
                zero_state: false,
            }],
        }
    }

    #[test]
    fn fires_once_and_tears_down() {
        let mut set = TriggerSet::new();
        set.insert(reg(0, "hero/stat[0]", 0.5));
        assert!(set.take_fired("hero/stat[0]", 0.4).is_empty());
        assert_eq!(set.take_fired("hero/stat[0]", 0.5).len(), 1);
        // Re-entering the viewport finds no registration left.
        assert!(set.take_fired("hero/stat[0]", 1.0).is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn same_target_registrations_fire_independently() {
        let mut set = TriggerSet::new();
        set.insert(reg(0, "emi/ring", 0.4));
        set.insert(reg(1, "emi/ring", 0.9));
        let fired = set.take_fired("emi/ring", 0.5);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, RegId(0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_is_the_cancellation_path() {
        let mut set = TriggerSet::new();
        set.insert(reg(3, "bars", 0.2));
        set.remove(RegId(3));
        assert!(set.take_fired("bars", 1.0).is_empty());
        // Removing again is a no-op.
        set.remove(RegId(3));
    }
}
