//! Diagnostics for the SPARQL harness.
//!
//! Every failure the harness can report is a [`HarnessError`]. The enum derives
//! `miette::Diagnostic` so the binary can render configuration problems against
//! the definition source that caused them.
//!
//! A validator reporting `success = false` is not an error and never appears here;
//! it is a normal [`crate::validators::ValidationOutcome`].

use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

pub type HarnessResult<T> = Result<T, HarnessError>;

/// Unified error type for all harness failure modes.
#[derive(Error, Diagnostic, Debug)]
pub enum HarnessError {
    /// A definition names a validator that is not registered.
    #[error("validator '{name}' not found")]
    #[diagnostic(code(sparql_tester::config::unknown_validator))]
    UnknownValidator {
        name: String,
        #[source_code]
        src: SourceArc,
        #[label("unknown validator")]
        span: Option<SourceSpan>,
        #[help]
        help: Option<String>,
    },

    /// The query service could not be reached or answered with a non-success status.
    #[error("request to {endpoint} failed: {message}")]
    #[diagnostic(code(sparql_tester::transport))]
    Transport {
        endpoint: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// The decoded payload lacks the `results.bindings` structure.
    #[error("query '{query}' returned a malformed result: {message}")]
    #[diagnostic(code(sparql_tester::response_shape))]
    ResponseShape { query: String, message: String },

    /// A definition file or directory could not be read.
    #[error("failed to read '{}': {message}", .path.display())]
    #[diagnostic(code(sparql_tester::io))]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl HarnessError {
    /// Short classification used in log lines and report rows.
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::UnknownValidator { .. } => "configuration",
            HarnessError::Transport { .. } => "transport",
            HarnessError::ResponseShape { .. } => "response shape",
            HarnessError::Io { .. } => "io",
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, HarnessError::UnknownValidator { .. })
    }

    pub fn transport(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        HarnessError::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    pub fn response_shape(query: impl Into<String>, message: impl Into<String>) -> Self {
        HarnessError::ResponseShape {
            query: query.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Wraps definition text into a named source for diagnostics.
pub fn to_named_source(name: &str, text: &str) -> SourceArc {
    Arc::new(NamedSource::new(name, text.to_string()))
}
