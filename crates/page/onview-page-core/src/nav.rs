//! Sticky-nav highlighting and scroll progress.
//!
//! This is the one place scroll-position polling is used instead of
//! intersection triggering: highlighting wants continuous feedback on every
//! scroll event, re-asserted as offsets change, where the one-shot triggers
//! want a single edge. Section offsets are cached and re-pushed by the host
//! on layout changes.

use onview_api_core::{TargetHandle, WriteBatch, WriteOp};

use crate::inputs::ScrollSample;

#[derive(Clone, Debug)]
pub struct NavSection {
    pub id: String,
    pub top_px: f32,
}

#[derive(Clone, Debug)]
pub struct NavState {
    pub sections: Vec<NavSection>,
    /// Link handles keyed in the same order as `sections`.
    pub links: Vec<(String, TargetHandle)>,
    pub active_class: String,
    pub underline: Option<TargetHandle>,
    pub percent_readout: Option<TargetHandle>,
    pub offset_px: f32,
    pub active: Option<String>,
}

impl NavState {
    /// Recompute progress and the active section from a scroll sample.
    /// Returns the newly activated section id, if it changed.
    pub fn on_scroll(&mut self, sample: ScrollSample, out: &mut WriteBatch) -> Option<String> {
        let scrollable = (sample.doc_h - sample.viewport_h).max(0.0);
        let pct = if scrollable > 0.0 {
            ((sample.scroll_y / scrollable) * 100.0).round().clamp(0.0, 100.0)
        } else {
            0.0
        };
        if let Some(underline) = &self.underline {
            out.push(WriteOp::set_style(
                underline.clone(),
                "width",
                format!("{}%", pct as i64),
            ));
        }
        if let Some(readout) = &self.percent_readout {
            out.push(WriteOp::set_text(readout.clone(), format!("{}%", pct as i64)));
        }

        // Last section whose top has scrolled past (minus the slack).
        let mut current: Option<&str> = None;
        for s in &self.sections {
            if sample.scroll_y >= s.top_px - self.offset_px {
                current = Some(&s.id);
            }
        }

        // Re-assert link classes on every sample; the writes are idempotent
        // and survive hosts that rebuild the nav between ticks.
        for (section, link) in &self.links {
            if Some(section.as_str()) == current {
                out.push(WriteOp::add_class(link.clone(), self.active_class.clone()));
            } else {
                out.push(WriteOp::remove_class(link.clone(), self.active_class.clone()));
            }
        }

        let current = current.map(|s| s.to_string());
        if current != self.active {
            self.active = current.clone();
            current
        } else {
            None
        }
    }

    /// Replace cached section offsets after the host re-measured layout.
    pub fn set_section_offsets(&mut self, offsets: &[(String, f32)]) {
        for (id, top) in offsets {
            if let Some(s) = self.sections.iter_mut().find(|s| &s.id == id) {
                s.top_px = *top;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onview_api_core::DomWrite;

    fn nav() -> NavState {
        NavState {
            sections: vec![
                NavSection {
                    id: "hook".into(),
                    top_px: 600.0,
                },
                NavSection {
                    id: "market".into(),
                    top_px: 1800.0,
                },
            ],
            links: vec![
                ("hook".into(), "nav/link[0]".into()),
                ("market".into(), "nav/link[1]".into()),
            ],
            active_class: "active".into(),
            underline: Some("nav/underline".into()),
            percent_readout: Some("nav/pct".into()),
            offset_px: 100.0,
            active: None,
        }
    }

    #[test]
    fn progress_and_active_section() {
        let mut n = nav();
        let mut out = WriteBatch::new();
        let changed = n.on_scroll(
            ScrollSample {
                scroll_y: 1750.0,
                viewport_h: 800.0,
                doc_h: 4300.0,
            },
            &mut out,
        );
        // 1750 / 3500 = 50%
        assert!(out
            .iter()
            .any(|op| matches!(&op.write, DomWrite::SetStyle { value, .. } if value == "50%")));
        // 1750 >= 1800 - 100 -> "market" is current.
        assert_eq!(changed.as_deref(), Some("market"));
        assert!(out
            .iter()
            .any(|op| op.target == "nav/link[1]"
                && matches!(&op.write, DomWrite::AddClass { .. })));
        assert!(out
            .iter()
            .any(|op| op.target == "nav/link[0]"
                && matches!(&op.write, DomWrite::RemoveClass { .. })));
    }

    #[test]
    fn unchanged_section_reports_none_but_still_writes() {
        let mut n = nav();
        let mut out = WriteBatch::new();
        let s = ScrollSample {
            scroll_y: 700.0,
            viewport_h: 800.0,
            doc_h: 4300.0,
        };
        assert_eq!(n.on_scroll(s, &mut out).as_deref(), Some("hook"));
        out.clear();
        assert_eq!(n.on_scroll(s, &mut out), None);
        assert!(!out.is_empty(), "progress writes continue every sample");
    }

    #[test]
    fn offsets_can_be_remeasured() {
        let mut n = nav();
        n.set_section_offsets(&[("market".into(), 2400.0)]);
        let mut out = WriteBatch::new();
        let changed = n.on_scroll(
            ScrollSample {
                scroll_y: 1900.0,
                viewport_h: 800.0,
                doc_h: 4300.0,
            },
            &mut out,
        );
        assert_eq!(changed.as_deref(), Some("hook"));
    }
}
