//! Error types for the engine crate.
//!
//! None of these cross the visual operations' boundary: sampling skips
//! elements that fail with [`AccessError`], and style application reports
//! [`InjectionError`] as a `false` result.

use thiserror::Error;

/// A page element could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The element belongs to a document this context may not inspect.
    #[error("element {0} is in a restricted context")]
    Restricted(usize),

    /// The element is no longer part of the document.
    #[error("element {0} is detached")]
    Detached(usize),
}

/// The page refused a style write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectionError {
    /// The document does not accept injected styles.
    #[error("document rejects style injection")]
    Restricted,

    /// No style element carries the given id.
    #[error("no style element with id '{0}'")]
    MissingElement(String),
}

/// A page snapshot could not be loaded.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors seen by an [`EngineHandle`](crate::EngineHandle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The serving loop is gone.
    #[error("engine is no longer serving")]
    Disconnected,

    /// The engine answered with a reply of the wrong kind.
    #[error("expected {expected} reply, got {actual}")]
    UnexpectedReply {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Result type for handle operations.
pub type Result<T> = std::result::Result<T, EngineError>;
