//! # Canonical Registry Builder
//!
//! Provides a single function to construct a fully populated validator registry
//! for both production and test use, so every code path shares the same
//! registration logic.
//!
//! Registry Invariant: the registry is built once at the entrypoint and passed by
//! reference to suite construction. Validator names are resolved against it before
//! any query is sent.

use crate::validators::builtin::register_builtin_validators;
use crate::validators::ValidatorRegistry;

/// Builds and returns a registry with all bundled validators registered.
///
/// # Example
/// ```
/// use sparql_tester::registry::build_default_validator_registry;
/// let registry = build_default_validator_registry();
/// assert!(registry.contains("NoValidator"));
/// ```
#[inline]
pub fn build_default_validator_registry() -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    register_builtin_validators(&mut registry);
    registry
}
