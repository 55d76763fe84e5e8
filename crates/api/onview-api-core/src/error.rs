//! Errors produced while parsing page specs and paths.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid element path: {0}")]
    InvalidPath(String),
    #[error("invalid percentage {value} for '{path}': must be in [0, 100]")]
    InvalidPercent { path: String, value: f32 },
    #[error("invalid threshold {value} for '{path}': must be in (0, 1]")]
    InvalidThreshold { path: String, value: f32 },
    #[error("spec json parse error: {0}")]
    SpecParse(String),
}
