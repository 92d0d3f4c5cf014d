//! # Validator System
//!
//! Validators inspect the bindings returned by a query and decide whether the
//! query passed. Each strategy is registered under a string name; definitions
//! pick one with a `## validator: <Name>` header line.
//!
//! ## Module Structure
//!
//! - **`builtin`**: The bundled strategies (`NoValidator`, `EmptyValidator`, `NotEmptyValidator`)
//!
//! ## Contracts
//!
//! - **Pure**: `validate` takes the result set and returns an immutable [`ValidationOutcome`].
//!   Validators hold no per-run state.
//! - **Failure is not an error**: a strategy reporting `success = false` still yields a
//!   complete outcome and a report row.

use std::collections::HashMap;

use crate::diagnostics::{HarnessError, SourceArc};
use miette::SourceSpan;

pub mod builtin;

/// One row of a query result set, mapping variable names to values.
pub type Binding = serde_json::Value;

/// Constructor stored in the registry.
pub type ValidatorCtor = fn() -> Box<dyn Validator>;

/// Name of the strategy selected when a definition does not specify one.
pub const DEFAULT_VALIDATOR: &str = "NoValidator";

/// Result of running a validator over a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub success: bool,
    pub description: String,
    pub message: String,
}

impl ValidationOutcome {
    pub fn pass(description: &str, message: impl Into<String>) -> Self {
        Self {
            success: true,
            description: description.to_string(),
            message: message.into(),
        }
    }

    pub fn fail(description: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            description: description.to_string(),
            message: message.into(),
        }
    }
}

/// A pluggable check over a query's bindings.
pub trait Validator: Send + Sync {
    /// Short statement of what the strategy checks.
    fn description(&self) -> &str;

    fn validate(&self, bindings: &[Binding]) -> ValidationOutcome;
}

/// A validator picked for one definition, together with the name it was registered under.
pub struct ResolvedValidator {
    pub name: String,
    pub validator: Box<dyn Validator>,
}

impl std::fmt::Debug for ResolvedValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedValidator")
            .field("name", &self.name)
            .field("description", &self.validator.description())
            .finish()
    }
}

/// Registry of validator constructors, inspectable at runtime.
#[derive(Default, Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, ValidatorCtor>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, ctor: ValidatorCtor) {
        self.validators.insert(name.to_string(), ctor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.validators.keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds a fresh instance of the named validator.
    pub fn get(&self, name: &str) -> Option<ResolvedValidator> {
        self.validators.get(name).map(|ctor| ResolvedValidator {
            name: name.to_string(),
            validator: ctor(),
        })
    }

    /// Resolves a name from a definition header.
    ///
    /// `src` and `span` locate the header line that named the validator so the
    /// resulting diagnostic can point at it.
    pub fn resolve(
        &self,
        name: &str,
        src: &SourceArc,
        span: Option<SourceSpan>,
    ) -> Result<ResolvedValidator, HarnessError> {
        self.get(name).ok_or_else(|| HarnessError::UnknownValidator {
            name: name.to_string(),
            src: SourceArc::clone(src),
            span,
            help: Some(format!("registered validators: {}", self.names().join(", "))),
        })
    }

    /// The strategy used when a definition names none.
    pub fn default_validator(&self) -> ResolvedValidator {
        self.get(DEFAULT_VALIDATOR).unwrap_or_else(|| ResolvedValidator {
            name: DEFAULT_VALIDATOR.to_string(),
            validator: Box::new(builtin::NoValidator),
        })
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}
