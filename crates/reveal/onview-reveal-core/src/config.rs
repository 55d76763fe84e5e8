//! Core configuration for onview-reveal-core.

use serde::{Deserialize, Serialize};

/// Engine-wide defaults and limits.
/// Keep this minimal; per-run values always win over defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Duration used when a run spec leaves duration_ms unset.
    pub default_duration_ms: u32,

    /// Stagger step used when a batch role leaves stagger_ms unset.
    pub default_stagger_step_ms: u32,

    /// Ticks a delegated run waits after activation before flipping its
    /// terminal value. Two ticks guarantee the host has committed the
    /// pre-animation state, so the external transition actually plays.
    pub settle_frames: u8,

    /// Maximum events retained per tick; extras are dropped.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration_ms: 1600,
            default_stagger_step_ms: 80,
            settle_frames: 2,
            max_events_per_tick: 1024,
        }
    }
}
