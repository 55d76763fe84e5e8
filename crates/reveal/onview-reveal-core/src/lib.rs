//! Onview Reveal Core (host-agnostic)
//!
//! The two primitives every Onview page is built from:
//! - a visibility trigger that fires at most once per observed element, and
//! - a one-shot animation run that carries a value from a start state to a
//!   terminal state and then stops for the lifetime of the page.
//!
//! The engine owns no host elements. Hosts feed it elapsed wall-clock time
//! and visibility samples each tick; it answers with a batch of idempotent
//! element writes plus semantic events. Interpolation either happens here
//! (driven runs) or is delegated to an external transition that only needs
//! the terminal value flipped at the right moment (delegated runs).

pub mod config;
pub mod easing;
pub mod engine;
pub mod ids;
pub mod inputs;
pub mod outputs;
pub mod run;
pub mod trigger;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use easing::Easing;
pub use engine::Engine;
pub use ids::{IdAllocator, RegId, RunId};
pub use inputs::{Inputs, VisibilitySample};
pub use outputs::{CoreEvent, Outputs};
pub use run::{FrameSink, RunMode, RunSpec, ValueFormat};
pub use trigger::Registration;
pub use onview_api_core::{DomWrite, TargetHandle, WriteBatch, WriteOp};
