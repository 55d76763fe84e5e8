//! Page specification: the per-page parameter tables.
//!
//! A PageSpec is everything a case-study page declares about its animated
//! elements: counters with targets and suffixes, a progress ring's radius
//! and percentage, bar heights and stagger steps, reveal batches, tab
//! groups, nav sections, chart tables. It is plain serde JSON so pages ship
//! as fixtures and hosts can author them by hand.

use serde::{Deserialize, Serialize};

use onview_api_core::{ElementPath, SpecError};

use crate::chart::ChartSpec;

fn default_counter_threshold() -> f32 {
    0.5
}
fn default_ring_threshold() -> f32 {
    0.4
}
fn default_container_threshold() -> f32 {
    0.2
}
fn default_reveal_threshold() -> f32 {
    0.08
}
fn default_chart_threshold() -> f32 {
    0.15
}
fn default_counter_duration() -> u32 {
    1600
}
fn default_ring_readout_duration() -> u32 {
    2200
}
fn default_bar_stagger() -> u32 {
    130
}
fn default_reveal_stagger() -> u32 {
    80
}
fn default_reveal_class() -> String {
    "visible".to_string()
}
fn default_active_class() -> String {
    "active".to_string()
}

/// A document section with its cached top offset, used by the nav
/// highlighter's scroll-position comparison.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    pub target: ElementPath,
    /// Cached offset of the section top from the document top, px.
    pub top_px: f32,
}

/// Sticky-nav wiring: links, progress indicators, reveal-after-hero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavSpec {
    pub links: Vec<NavLink>,
    #[serde(default = "default_active_class")]
    pub active_class: String,
    /// Element whose width tracks scroll progress, 0-100%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<ElementPath>,
    /// Element whose text tracks scroll progress ("42%").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_readout: Option<ElementPath>,
    /// Show the nav bar only after the hero section scrolls out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<NavReveal>,
    /// Slack subtracted from section tops when comparing scroll offsets.
    #[serde(default = "default_nav_offset")]
    pub offset_px: f32,
}

fn default_nav_offset() -> f32 {
    100.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavLink {
    pub section: String,
    pub target: ElementPath,
}

/// Continuous both-ways toggle, unlike the one-shot reveals: the bar hides
/// again when the hero comes back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavReveal {
    pub bar: ElementPath,
    pub hero: ElementPath,
    #[serde(default = "default_nav_reveal_threshold")]
    pub threshold: f32,
    #[serde(default = "default_visible_class")]
    pub class: String,
}

fn default_nav_reveal_threshold() -> f32 {
    0.1
}
fn default_visible_class() -> String {
    "visible".to_string()
}

/// Tab group: buttons paired with panels, one active at a time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TabGroupSpec {
    pub group: String,
    pub buttons: Vec<ElementPath>,
    pub panels: Vec<TabPanelSpec>,
    #[serde(default = "default_active_class")]
    pub active_class: String,
    #[serde(default)]
    pub initial: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TabPanelSpec {
    pub target: ElementPath,
    /// Containers of one-shot roles inside this panel. Their runs are
    /// re-played when the panel becomes active, since hiding the panel
    /// reset them to the zero state.
    #[serde(default)]
    pub contains: Vec<ElementPath>,
}

/// One animatable role on the page.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleSpec {
    /// Numeric ticker: text counts from 0 to `value`.
    Counter {
        target: ElementPath,
        value: f32,
        #[serde(default)]
        decimals: u8,
        #[serde(default)]
        suffix: String,
        #[serde(default = "default_counter_duration")]
        duration_ms: u32,
        #[serde(default = "default_counter_threshold")]
        threshold: f32,
    },
    /// Stroke-offset progress ring plus optional percentage readout.
    Ring {
        ring: ElementPath,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        readout: Option<ElementPath>,
        radius: f32,
        percent: f32,
        #[serde(default = "default_ring_readout_duration")]
        readout_duration_ms: u32,
        #[serde(default = "default_ring_threshold")]
        threshold: f32,
    },
    /// Vertical bar chart: heights grow to their percentages, staggered.
    BarChart {
        container: ElementPath,
        bars: Vec<BarSpec>,
        #[serde(default = "default_bar_stagger")]
        stagger_ms: u32,
        #[serde(default = "default_container_threshold")]
        threshold: f32,
    },
    /// Horizontal fill bars: widths grow to their percentages together.
    HBarGroup {
        container: ElementPath,
        fills: Vec<FillSpec>,
        #[serde(default = "default_container_threshold")]
        threshold: f32,
    },
    /// Class-toggle reveal batch with pending-sibling stagger.
    Reveal {
        targets: Vec<ElementPath>,
        #[serde(default = "default_reveal_class")]
        class: String,
        #[serde(default = "default_reveal_stagger")]
        stagger_ms: u32,
        #[serde(default = "default_reveal_threshold")]
        threshold: f32,
    },
    /// Lazily built data-visualization chart.
    Chart {
        container: ElementPath,
        chart: ChartSpec,
        #[serde(default = "default_chart_threshold")]
        threshold: f32,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarSpec {
    pub target: ElementPath,
    pub height_pct: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FillSpec {
    pub target: ElementPath,
    pub width_pct: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSpec {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<NavSpec>,
    #[serde(default)]
    pub roles: Vec<RoleSpec>,
    #[serde(default)]
    pub tab_groups: Vec<TabGroupSpec>,
}

// Container roles observe elements that are typically wide or tall. A
// fraction above this is unreachable for anything taller than the viewport,
// which leaves the trigger silently unfired; the cure is always to observe
// a smaller proxy element, never to raise the threshold.
const MAX_CONTAINER_THRESHOLD: f32 = 0.6;

fn check_threshold(path: &ElementPath, value: f32, max: f32) -> Result<(), SpecError> {
    if !(value > 0.0 && value <= max) {
        return Err(SpecError::InvalidThreshold {
            path: path.to_string(),
            value,
        });
    }
    Ok(())
}

fn check_percent(path: &ElementPath, value: f32) -> Result<(), SpecError> {
    if !(0.0..=100.0).contains(&value) || !value.is_finite() {
        return Err(SpecError::InvalidPercent {
            path: path.to_string(),
            value,
        });
    }
    Ok(())
}

impl PageSpec {
    /// Parse a page spec from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SpecError> {
        serde_json::from_str(text).map_err(|e| SpecError::SpecParse(e.to_string()))
    }

    /// Validate basic invariants: thresholds reachable, percentages sane.
    pub fn validate_basic(&self) -> Result<(), SpecError> {
        for role in &self.roles {
            match role {
                RoleSpec::Counter {
                    target, threshold, ..
                } => check_threshold(target, *threshold, 1.0)?,
                RoleSpec::Ring {
                    ring,
                    percent,
                    threshold,
                    ..
                } => {
                    check_threshold(ring, *threshold, 1.0)?;
                    check_percent(ring, *percent)?;
                }
                RoleSpec::BarChart {
                    container,
                    bars,
                    threshold,
                    ..
                } => {
                    check_threshold(container, *threshold, MAX_CONTAINER_THRESHOLD)?;
                    for bar in bars {
                        check_percent(&bar.target, bar.height_pct)?;
                    }
                }
                RoleSpec::HBarGroup {
                    container,
                    fills,
                    threshold,
                } => {
                    check_threshold(container, *threshold, MAX_CONTAINER_THRESHOLD)?;
                    for fill in fills {
                        check_percent(&fill.target, fill.width_pct)?;
                    }
                }
                RoleSpec::Reveal {
                    targets, threshold, ..
                } => {
                    for t in targets {
                        check_threshold(t, *threshold, MAX_CONTAINER_THRESHOLD)?;
                    }
                }
                RoleSpec::Chart {
                    container,
                    threshold,
                    ..
                } => check_threshold(container, *threshold, MAX_CONTAINER_THRESHOLD)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_spec(threshold: f32) -> PageSpec {
        PageSpec {
            name: "t".into(),
            sections: vec![],
            nav: None,
            roles: vec![RoleSpec::Ring {
                ring: ElementPath::parse("emi/ring").unwrap(),
                readout: None,
                radius: 82.0,
                percent: 65.0,
                readout_duration_ms: 2200,
                threshold,
            }],
            tab_groups: vec![],
        }
    }

    #[test]
    fn accepts_reachable_thresholds() {
        assert!(ring_spec(0.4).validate_basic().is_ok());
    }

    #[test]
    fn rejects_zero_threshold() {
        assert!(ring_spec(0.0).validate_basic().is_err());
    }

    #[test]
    fn rejects_tall_container_thresholds() {
        let spec = PageSpec {
            name: "t".into(),
            sections: vec![],
            nav: None,
            roles: vec![RoleSpec::Chart {
                container: ElementPath::parse("section-market").unwrap(),
                chart: crate::chart::ChartSpec {
                    kind: crate::chart::ChartKind::Bar,
                    series: vec![],
                    axis: Default::default(),
                    entry: Default::default(),
                },
                // A chart section is taller than the viewport; 0.8 of it can
                // never be visible at once, so this must be rejected.
                threshold: 0.8,
            }],
            tab_groups: vec![],
        };
        assert!(spec.validate_basic().is_err());
    }
}
