//! Write operations produced by the engines to describe mutations of host
//! elements: text content, inline style, attributes, class membership.
//!
//! A WriteOp serializes to JSON as:
//!   { "target": "emi/ring", "write": { "op": "set_style", "name": "stroke-dashoffset", "value": "180.3" } }
//!
//! WriteBatch is a simple Vec<WriteOp> with helpers. Every write is an
//! idempotent terminal-value assignment; applying a batch twice must leave
//! the host in the same state as applying it once.

use serde::{Deserialize, Serialize};

use crate::TargetHandle;

/// One mutation of a host element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomWrite {
    /// Replace the element's text content.
    SetText { text: String },
    /// Set an inline style property.
    SetStyle { name: String, value: String },
    /// Set an attribute.
    SetAttr { name: String, value: String },
    /// Add a class to the element's class list.
    AddClass { class: String },
    /// Remove a class from the element's class list.
    RemoveClass { class: String },
}

/// A write aimed at one resolved target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WriteOp {
    pub target: TargetHandle,
    #[serde(flatten)]
    pub write: DomWrite,
}

impl WriteOp {
    pub fn new(target: impl Into<TargetHandle>, write: DomWrite) -> Self {
        Self {
            target: target.into(),
            write,
        }
    }

    pub fn set_text(target: impl Into<TargetHandle>, text: impl Into<String>) -> Self {
        Self::new(target, DomWrite::SetText { text: text.into() })
    }

    pub fn set_style(
        target: impl Into<TargetHandle>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            target,
            DomWrite::SetStyle {
                name: name.into(),
                value: value.into(),
            },
        )
    }

    pub fn set_attr(
        target: impl Into<TargetHandle>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            target,
            DomWrite::SetAttr {
                name: name.into(),
                value: value.into(),
            },
        )
    }

    pub fn add_class(target: impl Into<TargetHandle>, class: impl Into<String>) -> Self {
        Self::new(
            target,
            DomWrite::AddClass {
                class: class.into(),
            },
        )
    }

    pub fn remove_class(target: impl Into<TargetHandle>, class: impl Into<String>) -> Self {
        Self::new(
            target,
            DomWrite::RemoveClass {
                class: class.into(),
            },
        )
    }
}

/// A batch of write operations. Engines emit a WriteBatch each tick; hosts
/// apply it in order. Writes within one tick for one target come from a
/// single run, so append order is the only ordering that matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch(pub Vec<WriteOp>);

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch(Vec::new())
    }

    pub fn push(&mut self, op: WriteOp) {
        self.0.push(op);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = WriteOp>) {
        self.0.extend(other);
    }

    /// Merge another batch in-place (append).
    pub fn append(&mut self, mut other: WriteBatch) {
        self.0.append(&mut other.0);
    }

    pub fn into_vec(self) -> Vec<WriteOp> {
        self.0
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WriteOp> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
