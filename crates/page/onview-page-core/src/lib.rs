//! onview-page-core
//!
//! The page controller over onview-reveal-core: compiles a declarative
//! PageSpec (counters, rings, bar charts, reveals, chart tables, tab
//! groups, nav) into visibility registrations and one-shot runs, and owns
//! the two continuous behaviors that are deliberately not one-shots:
//! scroll-position nav highlighting and the hero/nav visibility toggle.

pub mod chart;
pub mod controller;
pub mod inputs;
pub mod nav;
pub mod outputs;
pub mod spec;
pub mod tabs;

pub use chart::{AxisHints, ChartKind, ChartSpec, Datum, EntryTransition, Series};
pub use controller::{IdentityResolver, PageController, TargetResolver};
pub use inputs::{PageInputs, ScrollSample, UiCommand, VisibilitySample};
pub use nav::{NavSection, NavState};
pub use outputs::{PageEvent, PageOutputs};
pub use spec::{
    BarSpec, FillSpec, NavLink, NavReveal, NavSpec, PageSpec, RoleSpec, SectionSpec, TabGroupSpec,
    TabPanelSpec,
};
pub use tabs::TabGroup;

pub use onview_reveal_core::Config;
