//! Input contracts for the page controller.

use serde::{Deserialize, Serialize};

pub use onview_reveal_core::VisibilitySample;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageInputs {
    /// Visibility fractions observed since the last tick.
    #[serde(default)]
    pub visibility: Vec<VisibilitySample>,
    /// Click-driven commands.
    #[serde(default)]
    pub commands: Vec<UiCommand>,
    /// Latest scroll position, if it changed this tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollSample>,
}

impl PageInputs {
    pub fn visible(target: &str, fraction: f32) -> Self {
        Self {
            visibility: vec![VisibilitySample {
                target: target.to_string(),
                fraction,
            }],
            ..Self::default()
        }
    }

    pub fn command(cmd: UiCommand) -> Self {
        Self {
            commands: vec![cmd],
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum UiCommand {
    /// A tab button was clicked.
    SelectTab { group: String, panel: usize },
    /// A nav link was clicked; the host should smooth-scroll to the target.
    NavClick { section: String },
}

/// Continuous scroll feedback, polled by the host on its scroll events.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    pub scroll_y: f32,
    pub viewport_h: f32,
    pub doc_h: f32,
}
