//! ElementPath parsing and formatting.
//!
//! Grammar (simple, host-agnostic):
//!   section/.../element[index]
//! - '/' separates section segments
//! - The last '/'-separated segment names the element, with an optional
//!   bracketed index for the n-th element of a batch.
//!   Examples:
//!   "emi/ring"        -> sections=["emi"], element="ring", index=None
//!   "hero/stat[2]"    -> sections=["hero"], element="stat", index=Some(2)
//!   "nav"             -> sections=[], element="nav", index=None
//!
//! ElementPath is intentionally simple and string-based; adapters resolve it
//! into whatever identifies the element on their side (a DOM id, a selector).

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SpecError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementPath {
    /// Section segments preceding the element (may be empty)
    pub sections: Vec<String>,
    /// Element name (last segment before the optional index)
    pub element: String,
    /// Optional index into a sibling batch
    pub index: Option<u32>,
}

impl ElementPath {
    /// Construct an ElementPath from components.
    pub fn new(sections: Vec<String>, element: impl Into<String>, index: Option<u32>) -> Self {
        Self {
            sections,
            element: element.into(),
            index,
        }
    }

    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, SpecError> {
        if s.is_empty() {
            return Err(SpecError::InvalidPath("empty path".into()));
        }
        let mut parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|seg| seg.is_empty()) {
            return Err(SpecError::InvalidPath(format!(
                "empty segment in '{s}'"
            )));
        }
        let last = parts.pop().unwrap();

        let (element, index) = match last.find('[') {
            Some(open) => {
                let close = last
                    .rfind(']')
                    .filter(|c| *c == last.len() - 1 && *c > open + 1)
                    .ok_or_else(|| {
                        SpecError::InvalidPath(format!("unterminated index in '{s}'"))
                    })?;
                let idx: u32 = last[open + 1..close].parse().map_err(|_| {
                    SpecError::InvalidPath(format!("non-numeric index in '{s}'"))
                })?;
                (&last[..open], Some(idx))
            }
            None => (last, None),
        };
        if element.is_empty() {
            return Err(SpecError::InvalidPath(format!("empty element in '{s}'")));
        }
        if element.chars().any(char::is_whitespace)
            || parts.iter().any(|seg| seg.chars().any(char::is_whitespace))
        {
            return Err(SpecError::InvalidPath(format!(
                "whitespace in path '{s}'"
            )));
        }

        Ok(ElementPath {
            sections: parts.into_iter().map(|p| p.to_string()).collect(),
            element: element.to_string(),
            index,
        })
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.sections {
            write!(f, "{seg}/")?;
        }
        write!(f, "{}", self.element)?;
        if let Some(i) = self.index {
            write!(f, "[{i}]")?;
        }
        Ok(())
    }
}

impl FromStr for ElementPath {
    type Err = SpecError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementPath::parse(s)
    }
}

// Serialize as a plain string so specs and write batches stay readable JSON.
impl Serialize for ElementPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ElementPath {
    fn deserialize<D>(deserializer: D) -> Result<ElementPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ElementPath::parse(&s).map_err(de::Error::custom)
    }
}
