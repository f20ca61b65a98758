//! Error types for stylesheet synthesis and palette loading.
//!
//! This module provides [`RenderError`]. It abstracts over the template engine
//! and YAML parser so neither leaks into the public API.

use std::fmt;

/// Error type for rendering and palette operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Template syntax or evaluation failure.
    TemplateError(String),

    /// A palette slot holds something that is not a color.
    InvalidColor {
        /// Palette slot (`background`, `text`, ...).
        slot: String,
        /// The rejected value.
        value: String,
    },

    /// Preset definitions could not be read.
    PresetError(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateError(msg) => write!(f, "template error: {}", msg),
            RenderError::InvalidColor { slot, value } => {
                write!(f, "invalid color for '{}': {:?}", slot, value)
            }
            RenderError::PresetError(msg) => write!(f, "preset error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::TemplateError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(err: serde_yaml::Error) -> Self {
        RenderError::PresetError(err.to_string())
    }
}
