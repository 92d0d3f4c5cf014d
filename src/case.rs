//! Execution of a single query definition.
//!
//! A [`TestCase`] binds one definition to its resolved validator. Running it
//! sends the prefixed query, checks the response shape, validates the bindings
//! and builds a deep link back into the interactive viewer:
//!
//! 1. **Resolve**: the validator is looked up when the case is built, so an
//!    unknown name fails before any request is made
//! 2. **Compose**: the prefix block is prepended to the raw query text
//! 3. **Execute**: transport errors are returned unchanged
//! 4. **Shape**: the payload must contain `results.bindings`
//! 5. **Validate**: the bindings go through the validator

use serde_json::Value;
use tracing::{info, warn};
use url::form_urlencoded;

use crate::config::{DEFAULT_VIEWER_BASE, WIKIDATA_PREFIXES};
use crate::definition::QueryDefinition;
use crate::diagnostics::{HarnessError, HarnessResult};
use crate::executor::QueryExecutor;
use crate::validators::{Binding, ResolvedValidator, ValidationOutcome, ValidatorRegistry};

/// Everything produced by one successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub name: String,
    pub description: String,
    pub validator: String,
    pub outcome: ValidationOutcome,
    pub url: String,
    pub bindings: Vec<Binding>,
}

#[derive(Debug)]
pub struct TestCase {
    definition: QueryDefinition,
    validator: ResolvedValidator,
    prefix: String,
    viewer_base: String,
}

impl TestCase {
    /// Binds a definition to its validator.
    ///
    /// Fails with [`HarnessError::UnknownValidator`] when the header names a validator
    /// the registry does not know. A missing `validator` key selects the default.
    pub fn new(
        definition: QueryDefinition,
        registry: &ValidatorRegistry,
        prefix: &str,
    ) -> HarnessResult<Self> {
        let validator = match definition.config().validator() {
            Some(name) => registry.resolve(
                name,
                &definition.named_source(),
                definition.validator_span(),
            )?,
            None => {
                warn!("{}: no validator specified", definition.name());
                registry.default_validator()
            }
        };
        let prefix = if prefix.trim().is_empty() {
            WIKIDATA_PREFIXES.to_string()
        } else {
            prefix.to_string()
        };
        Ok(Self {
            definition,
            validator,
            prefix,
            viewer_base: DEFAULT_VIEWER_BASE.to_string(),
        })
    }

    /// Links results into `viewer_base` instead of the public viewer.
    pub fn with_viewer_base(mut self, viewer_base: impl Into<String>) -> Self {
        self.viewer_base = viewer_base.into();
        self
    }

    pub fn viewer_base(&self) -> &str {
        &self.viewer_base
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn definition(&self) -> &QueryDefinition {
        &self.definition
    }

    /// Registered name of the selected validator.
    pub fn validator_name(&self) -> &str {
        &self.validator.name
    }

    pub fn validator_description(&self) -> &str {
        self.validator.validator.description()
    }

    /// The text sent to the query service.
    pub fn compose_query(&self) -> String {
        format!("{}\n{}", self.prefix, self.definition.text())
    }

    /// Runs the query once and validates its bindings. No retries.
    pub fn run(&self, executor: &dyn QueryExecutor) -> HarnessResult<TestResult> {
        info!("running: {}", self.name());
        let payload = executor.execute(&self.compose_query())?;
        let bindings = extract_bindings(self.name(), payload)?;
        let outcome = self.validator.validator.validate(&bindings);
        Ok(TestResult {
            name: self.name().to_string(),
            description: self.definition.description().to_string(),
            validator: self.validator.name.clone(),
            outcome,
            url: self.link(),
            bindings,
        })
    }

    /// Link into the configured viewer.
    pub fn link(&self) -> String {
        self.deep_link(&self.viewer_base)
    }

    /// Link that opens the raw query text in the interactive viewer.
    pub fn deep_link(&self, viewer_base: &str) -> String {
        deep_link(viewer_base, self.definition.text())
    }
}

/// Encodes `query` into a viewer link with spaces as `%20`.
///
/// Plus-style quoting escapes `*` and keeps `~`, the reverse of form encoding,
/// so both are swapped after serialising. A literal `+` or `%` in the query is
/// escaped first, which keeps the rewrites limited to the bytes they target.
pub fn deep_link(viewer_base: &str, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    let encoded = encoded
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~");
    format!("{}{}", viewer_base, encoded)
}

/// Pulls `results.bindings` out of a decoded payload.
pub fn extract_bindings(query: &str, payload: Value) -> HarnessResult<Vec<Binding>> {
    let Value::Object(mut root) = payload else {
        return Err(HarnessError::response_shape(query, "payload is not a JSON object"));
    };
    let Some(Value::Object(mut results)) = root.remove("results") else {
        return Err(HarnessError::response_shape(query, "missing 'results' object"));
    };
    let Some(Value::Array(bindings)) = results.remove("bindings") else {
        return Err(HarnessError::response_shape(
            query,
            "missing 'results.bindings' array",
        ));
    };
    Ok(bindings)
}

/// Multi-line dump of one result for console inspection.
pub fn render_detail(case: &TestCase, result: &TestResult) -> String {
    let bindings = serde_json::to_string_pretty(&result.bindings).unwrap_or_default();
    format!(
        "Query: {}\nValidator: {} ({})\nPASS?: {}\nMessage: {}\n-----------\nSPARQL: {}\n-----------\nResult: {}\n",
        result.name,
        result.validator,
        result.outcome.description,
        result.outcome.success,
        result.outcome.message,
        case.definition().text(),
        bindings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::StaticExecutor;
    use crate::registry::build_default_validator_registry;
    use serde_json::json;

    const CATS: &str =
        "# Find all cats\n## validator: NoValidator\nSELECT * WHERE { ?a wdt:P31 wd:Q146 }\n";

    fn case(text: &str) -> HarnessResult<TestCase> {
        let registry = build_default_validator_registry();
        TestCase::new(
            QueryDefinition::from_source("q.sparql", text),
            &registry,
            WIKIDATA_PREFIXES,
        )
    }

    #[test]
    fn composes_prefix_then_query() {
        let case = case(CATS).unwrap();
        let composed = case.compose_query();
        assert!(composed.starts_with(WIKIDATA_PREFIXES));
        assert!(composed.ends_with(CATS));
    }

    #[test]
    fn empty_prefix_falls_back_to_default() {
        let registry = build_default_validator_registry();
        let case = TestCase::new(QueryDefinition::from_source("q", CATS), &registry, "").unwrap();
        assert!(case.compose_query().contains("PREFIX wdt:"));
    }

    #[test]
    fn custom_prefix_is_used() {
        let registry = build_default_validator_registry();
        let prefix = "PREFIX ex: <http://example.org/>";
        let case = TestCase::new(QueryDefinition::from_source("q", CATS), &registry, prefix).unwrap();
        assert_eq!(case.compose_query(), format!("{}\n{}", prefix, CATS));
    }

    #[test]
    fn deep_link_has_no_plus() {
        let link = deep_link(DEFAULT_VIEWER_BASE, "SELECT ?a WHERE { ?a ?b 1+2 }");
        assert!(link.starts_with("https://query.wikidata.org/#"));
        assert!(!link.contains('+'));
        assert!(link.contains("SELECT%20%3Fa%20WHERE"));
        assert!(link.contains("1%2B2"));
    }

    #[test]
    fn deep_link_encodes_newlines() {
        let link = deep_link("v#", "# a\nb");
        assert_eq!(link, "v#%23%20a%0Ab");
    }

    #[test]
    fn extract_bindings_requires_results_and_bindings() {
        assert!(extract_bindings("q", json!({"unexpected": {}})).is_err());
        assert!(extract_bindings("q", json!({"results": {}})).is_err());
        assert!(extract_bindings("q", json!({"results": {"bindings": {}}})).is_err());
        assert!(extract_bindings("q", json!([])).is_err());
        let rows = extract_bindings("q", json!({"results": {"bindings": [{"a": 1}]}})).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn run_produces_outcome_and_link() {
        let case = case(CATS).unwrap();
        let executor = StaticExecutor::sample();
        let result = case.run(&executor).unwrap();
        assert_eq!(executor.calls(), 1);
        assert_eq!(result.name, "q.sparql");
        assert_eq!(result.description, "Find all cats");
        assert_eq!(result.validator, "NoValidator");
        assert!(result.outcome.success);
        assert_eq!(result.bindings.len(), 2);
        assert_eq!(result.url, case.deep_link(DEFAULT_VIEWER_BASE));
    }

    #[test]
    fn configured_viewer_base_flows_into_result_link() {
        let case = case(CATS)
            .unwrap()
            .with_viewer_base("https://viewer.example/#");
        assert_eq!(case.viewer_base(), "https://viewer.example/#");
        let result = case.run(&StaticExecutor::sample()).unwrap();
        assert!(result.url.starts_with("https://viewer.example/#"));
        assert_eq!(result.url, case.link());
    }

    #[test]
    fn deep_link_escapes_like_plus_quoting() {
        let link = deep_link("", "SELECT * WHERE { ?a ~ ?b }");
        assert_eq!(link, "SELECT%20%2A%20WHERE%20%7B%20%3Fa%20~%20%3Fb%20%7D");
    }

    #[test]
    fn deep_link_keeps_escaped_percent_and_tilde_distinct() {
        assert_eq!(deep_link("", "%7E ~"), "%257E%20~");
    }

    #[test]
    fn render_detail_includes_status_and_query() {
        let case = case(CATS).unwrap();
        let result = case.run(&StaticExecutor::sample()).unwrap();
        let detail = render_detail(&case, &result);
        assert!(detail.contains("Query: q.sparql"));
        assert!(detail.contains("Validator: NoValidator (No validation)"));
        assert!(detail.contains("PASS?: true"));
        assert!(detail.contains("Message: No validation performed"));
        assert!(detail.contains("wd:Q146"));
    }

    #[test]
    fn render_detail_prints_result_bindings() {
        let case = case(CATS).unwrap();
        let result = case.run(&StaticExecutor::sample()).unwrap();
        let detail = render_detail(&case, &result);
        let (_, bindings) = detail.split_once("Result: ").unwrap();
        let rows: Vec<Binding> = serde_json::from_str(bindings.trim_end()).unwrap();
        assert_eq!(rows, result.bindings);
        assert!(bindings.contains("\"value\": \"2\""));
    }
}
