//! Query definitions loaded from disk.

use std::path::{Path, PathBuf};

use miette::SourceSpan;

use crate::diagnostics::{to_named_source, HarnessError, HarnessResult, SourceArc};
use crate::header::{parse_header, HeaderConfig, VALIDATOR_KEY};

/// One query file: its text plus both parsed header tiers.
#[derive(Debug, Clone)]
pub struct QueryDefinition {
    name: String,
    path: Option<PathBuf>,
    text: String,
    description: String,
    config: HeaderConfig,
}

impl QueryDefinition {
    /// Builds a definition from in-memory text. `name` identifies it in reports.
    pub fn from_source(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let header = parse_header(&text);
        Self {
            name: name.into(),
            path: None,
            text,
            description: header.description,
            config: header.config,
        }
    }

    /// Reads and parses a definition file. The file name becomes its identity.
    pub fn from_file<P: AsRef<Path>>(path: P) -> HarnessResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut definition = Self::from_source(name, text);
        definition.path = Some(path.to_path_buf());
        Ok(definition)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The raw file text, header lines included.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    /// Source handle for diagnostics about this definition.
    pub fn named_source(&self) -> SourceArc {
        to_named_source(&self.name, &self.text)
    }

    /// Location of the `## validator:` line, if there is one.
    pub fn validator_span(&self) -> Option<SourceSpan> {
        self.config
            .span_of(VALIDATOR_KEY)
            .map(|range| SourceSpan::from(range.start..range.end))
    }
}
