//! # Bundled Validators
//!
//! The strategies every registry starts with. `NoValidator` is the default and
//! must always be present; the count checks cover the common shapes of
//! maintenance queries, which list violations and should come back empty, and
//! example queries, which should return something.

use super::{Binding, Validator, ValidationOutcome, ValidatorRegistry, DEFAULT_VALIDATOR};

/// Registers all bundled validators in the given registry.
pub fn register_builtin_validators(registry: &mut ValidatorRegistry) {
    registry.register(DEFAULT_VALIDATOR, no_validator);
    registry.register("EmptyValidator", empty_validator);
    registry.register("NotEmptyValidator", not_empty_validator);
}

fn no_validator() -> Box<dyn Validator> {
    Box::new(NoValidator)
}

fn empty_validator() -> Box<dyn Validator> {
    Box::new(EmptyValidator)
}

fn not_empty_validator() -> Box<dyn Validator> {
    Box::new(NotEmptyValidator)
}

/// Accepts any result set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidator;

impl Validator for NoValidator {
    fn description(&self) -> &str {
        "No validation"
    }

    fn validate(&self, _bindings: &[Binding]) -> ValidationOutcome {
        ValidationOutcome::pass(self.description(), "No validation performed")
    }
}

/// Passes when the query returns no bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyValidator;

impl Validator for EmptyValidator {
    fn description(&self) -> &str {
        "Query should return no results"
    }

    fn validate(&self, bindings: &[Binding]) -> ValidationOutcome {
        match bindings.len() {
            0 => ValidationOutcome::pass(self.description(), "Query returned no results"),
            n => ValidationOutcome::fail(
                self.description(),
                format!("Query returned {} results, expected none", n),
            ),
        }
    }
}

/// Passes when the query returns at least one binding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmptyValidator;

impl Validator for NotEmptyValidator {
    fn description(&self) -> &str {
        "Query should return at least one result"
    }

    fn validate(&self, bindings: &[Binding]) -> ValidationOutcome {
        match bindings.len() {
            0 => ValidationOutcome::fail(self.description(), "Query returned no results"),
            n => ValidationOutcome::pass(self.description(), format!("Query returned {} results", n)),
        }
    }
}
