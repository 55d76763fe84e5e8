//! Easing curves: named presets plus cubic-bezier timing.
//!
//! The bezier variant mirrors CSS timing functions: control points
//! (x1, y1, x2, y2) define a curve through (0,0) and (1,1); the eased
//! progress is found by inverting the x polynomial via binary search.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// 1 - (1 - t)^3, the counter curve used across the case-study pages.
    EaseOutCubic,
    EaseInOutCubic,
    CubicBezier {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

impl Default for Easing {
    fn default() -> Self {
        Easing::EaseOutCubic
    }
}

#[inline]
fn cubic_bezier(p1: f32, p2: f32, t: f32) -> f32 {
    // Endpoints fixed at 0 and 1.
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

/// Invert the x bezier via binary search, then evaluate y.
#[inline]
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Fast path: Bezier(0,0,1,1) is exactly linear -> eased t == t
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(x1, x2, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(y1, y2, mid)
}

impl Easing {
    /// Map raw progress in [0,1] to eased progress. Input is clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Easing::CubicBezier { x1, y1, x2, y2 } => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::CubicBezier {
            x1: 0.42,
            y1: 0.0,
            x2: 0.58,
            y2: 1.0,
        },
    ];

    #[test]
    fn endpoints_are_stable() {
        for e in ALL {
            assert!((e.apply(0.0) - 0.0).abs() < 1e-4);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn monotonic_on_grid() {
        for e in ALL {
            let mut last = 0.0f32;
            for i in 0..=100 {
                let v = e.apply(i as f32 / 100.0);
                assert!(v >= last - 1e-5, "{e:?} not monotonic at {i}");
                last = v;
            }
        }
    }

    #[test]
    fn out_cubic_matches_closed_form() {
        let t = 0.25f32;
        assert!((Easing::EaseOutCubic.apply(t) - (1.0 - (1.0 - t).powi(3))).abs() < 1e-6);
    }

    #[test]
    fn bezier_linear_fast_path() {
        let e = Easing::CubicBezier {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        assert_eq!(e.apply(0.37), 0.37);
    }
}
