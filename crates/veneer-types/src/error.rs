//! Error types for Veneer.
//!
//! Only [`SkinError::NoLayouts`] aborts a skin load. Every other problem
//! found while parsing is recorded as a [`Diagnostic`] and recovered
//! locally with a degraded default.

use std::fmt;
use std::io;

/// Errors produced by the Veneer skin engine.
#[derive(Debug, thiserror::Error)]
pub enum SkinError {
    /// Malformed tag, duplicate layout name, missing required attribute.
    #[error("document error: {0}")]
    Document(String),

    /// Bitmap missing or unreadable, or a sprite grid that fails slicing.
    #[error("resource error: {0}")]
    Resource(String),

    /// Unparsable position expression.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Persisted geometry blob does not match the parsed document.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A full parse produced no layouts at all.
    #[error("skin '{0}' declares no layouts")]
    NoLayouts(String),

    /// The host surface refused an operation.
    #[error("host error: {0}")]
    Host(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SkinError>;

/// Category of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Document,
    Resource,
    Geometry,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Resource => write!(f, "resource"),
            Self::Geometry => write!(f, "geometry"),
        }
    }
}

/// A recoverable problem recorded during a skin load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based source line, 0 when the problem has no source position.
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{} error at line {}: {}", self.kind, self.line, self.message)
        } else {
            write!(f, "{} error: {}", self.kind, self.message)
        }
    }
}
