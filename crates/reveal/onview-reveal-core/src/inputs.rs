//! Input contracts for the core engine.
//!
//! Hosts build and pass these into Engine::update() each tick. Visibility
//! samples come from whatever intersection primitive the host has; the
//! engine only needs the observed handle and the currently visible fraction.

use serde::{Deserialize, Serialize};

use onview_api_core::TargetHandle;

use crate::ids::RegId;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Visibility fractions observed since the last tick.
    #[serde(default)]
    pub visibility: Vec<VisibilitySample>,
    /// Registrations to cancel before visibility is processed.
    #[serde(default)]
    pub cancels: Vec<RegId>,
}

impl Inputs {
    pub fn visible(target: impl Into<TargetHandle>, fraction: f32) -> Self {
        Self {
            visibility: vec![VisibilitySample {
                target: target.into(),
                fraction,
            }],
            cancels: Vec::new(),
        }
    }
}

/// One intersection observation: how much of `target` is inside the viewport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisibilitySample {
    pub target: TargetHandle,
    /// Visible fraction of the element's bounding box, in [0, 1].
    pub fraction: f32,
}
