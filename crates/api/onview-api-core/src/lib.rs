//! onview-api-core: shared write-op and path vocabulary (core, engine-agnostic)

pub mod element_path;
pub mod error;
pub mod write_ops;

pub use element_path::ElementPath;
pub use error::SpecError;
pub use write_ops::{DomWrite, WriteBatch, WriteOp};

/// Opaque resolved handle for a host element (small string key).
/// Hosts resolve an [`ElementPath`] to whatever identifies the element on
/// their side (a DOM id, a selector, a numeric index rendered as text).
pub type TargetHandle = String;
