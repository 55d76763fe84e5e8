//! Output contracts from the page controller.

use serde::{Deserialize, Serialize};

use onview_api_core::{TargetHandle, WriteBatch};
use onview_reveal_core::CoreEvent;

use crate::chart::ChartSpec;

/// Page-level semantic signals; reveal-engine events pass through.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PageEvent {
    Reveal(CoreEvent),
    /// First visibility of a chart container: hand the table to the
    /// charting collaborator. Emitted at most once per container.
    ChartBuildRequested {
        target: TargetHandle,
        chart: ChartSpec,
    },
    /// The host should smooth-scroll this element into view.
    ScrollRequested { target: TargetHandle },
    /// The active nav section changed.
    SectionActivated { section: String },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageOutputs {
    #[serde(default)]
    pub writes: WriteBatch,
    #[serde(default)]
    pub events: Vec<PageEvent>,
}

impl PageOutputs {
    #[inline]
    pub fn clear(&mut self) {
        self.writes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }
}
