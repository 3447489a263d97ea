//! Unified error types for bd-spdx-export.
//!
//! Only two classes of failure abort an export: the BOM server cannot resolve
//! the requested project/version (or its BOM snapshot cannot be fetched), and
//! the finished document cannot be written. Every per-component enrichment
//! failure is recorded as an [`EnrichmentError`](crate::enrichment::EnrichmentError)
//! and degraded to a sentinel value instead of surfacing here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExportError {
    /// A project or version name could not be resolved on the server
    #[error("{kind} '{name}' does not exist")]
    NotFound {
        kind: NotFoundKind,
        name: String,
        /// Names that do exist, for diagnostics
        available: Vec<String>,
    },

    /// Errors talking to the BOM source
    #[error("BOM source request failed: {context}")]
    Source {
        context: String,
        #[source]
        source: SourceErrorKind,
    },

    /// Errors while fetching one piece of component metadata
    #[error("Enrichment failed: {context}")]
    Enrichment {
        context: String,
        #[source]
        source: EnrichmentErrorKind,
    },

    /// Errors producing the output document
    #[error("Output failed: {context}")]
    Output {
        context: String,
        #[source]
        source: OutputErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// What kind of name failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Project,
    Version,
}

impl std::fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "Project"),
            Self::Version => write!(f, "Version"),
        }
    }
}

/// Specific BOM source error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SourceErrorKind {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Resource not available: {0}")]
    MissingResource(String),
}

/// Specific enrichment error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EnrichmentErrorKind {
    #[error("Missing link '{0}' on component")]
    MissingLink(String),

    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    #[error("Request timed out")]
    Timeout,
}

/// Specific output error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OutputErrorKind {
    #[error("JSON serialization failed: {0}")]
    Serialization(String),

    #[error("Cannot write {path:?}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Cannot move existing file {path:?} aside: {message}")]
    Backup { path: PathBuf, message: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl ExportError {
    /// Create a not-found error for a project name
    pub fn project_not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Project,
            name: name.into(),
            available,
        }
    }

    /// Create a not-found error for a version name
    pub fn version_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Version,
            name: name.into(),
            available: Vec::new(),
        }
    }

    /// Create a source error with context
    pub fn source(context: impl Into<String>, source: SourceErrorKind) -> Self {
        Self::Source {
            context: context.into(),
            source,
        }
    }

    /// Create a source error for a resource the server does not offer
    pub fn missing_resource(context: impl Into<String>, what: impl Into<String>) -> Self {
        Self::source(context, SourceErrorKind::MissingResource(what.into()))
    }

    /// Create an enrichment error
    pub fn enrichment(context: impl Into<String>, source: EnrichmentErrorKind) -> Self {
        Self::Enrichment {
            context: context.into(),
            source,
        }
    }

    /// Create an output error
    pub fn output(context: impl Into<String>, source: OutputErrorKind) -> Self {
        Self::Output {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for a project/version resolution failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the finished document could not be written.
    #[must_use]
    pub const fn is_output_failure(&self) -> bool {
        matches!(self, Self::Output { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::source(
            "JSON deserialization",
            SourceErrorKind::InvalidResponse(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// ```ignore
/// use bd_spdx_export::error::ErrorContext;
///
/// let items = client.get_items(&href).context("fetching hierarchical BOM")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    ///
    /// The context string is prepended to the error's existing context,
    /// creating a chain that shows the path through the code.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<ExportError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: ExportError, new_ctx: &str) -> ExportError {
    match err {
        ExportError::Source {
            context: existing,
            source,
        } => ExportError::Source {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ExportError::Enrichment {
            context: existing,
            source,
        } => ExportError::Enrichment {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ExportError::Output {
            context: existing,
            source,
        } => ExportError::Output {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ExportError::Io {
            path,
            message,
            source,
        } => ExportError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ExportError::Config(msg) => ExportError::Config(chain_context(new_ctx, &msg)),
        ExportError::Validation(msg) => ExportError::Validation(chain_context(new_ctx, &msg)),
        // Resolution failures carry their own diagnostics
        not_found @ ExportError::NotFound { .. } => not_found,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| ExportError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| ExportError::Validation(f().into()))
    }
}
