//! Declarative chart tables.
//!
//! The page controller never computes chart geometry. A ChartSpec is a
//! literal data table plus entry-transition declarations; on first
//! visibility it is handed, verbatim, to the external charting collaborator
//! through a `ChartBuildRequested` event. Entry transitions (bar growth,
//! path-length reveal, label fades) are delegated to that collaborator's
//! own transition primitives.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HBar,
    StackedBar,
    Line,
    Donut,
}

/// One record of a series: `{label, value, color}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub label: String,
    pub value: f32,
    /// Per-datum color override (donut slices, highlighted bars).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub data: Vec<Datum>,
}

/// Hints the collaborator may use for scales and axis labels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_max: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_format: Option<String>,
}

/// Entry transition declaration, performed by the collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryTransition {
    pub duration_ms: u32,
    #[serde(default)]
    pub stagger_ms: u32,
    /// Value labels fade in this long after the entry finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_fade_ms: Option<u32>,
}

impl Default for EntryTransition {
    fn default() -> Self {
        Self {
            duration_ms: 900,
            stagger_ms: 100,
            label_fade_ms: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub series: Vec<Series>,
    #[serde(default)]
    pub axis: AxisHints,
    #[serde(default)]
    pub entry: EntryTransition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_table_roundtrip() {
        let json = serde_json::json!({
            "kind": "h_bar",
            "series": [{
                "name": "price",
                "color": "#E8A020",
                "data": [
                    { "label": "Biscoff India", "value": 45.0, "color": "#E8A020" },
                    { "label": "Parle-G", "value": 10.0 }
                ]
            }],
            "entry": { "duration_ms": 900, "stagger_ms": 100 }
        });
        let spec: ChartSpec = serde_json::from_value(json).unwrap();
        assert_eq!(spec.kind, ChartKind::HBar);
        assert_eq!(spec.series[0].data.len(), 2);
        assert!(spec.series[0].data[1].color.is_none());
    }
}
