//! Harness configuration.
//!
//! Everything a run needs besides the definitions themselves lives in
//! [`HarnessConfig`]. Definitions carry their own per-query settings in their
//! headers; there is no configuration file.

use std::time::Duration;

/// Default query service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Client marker sent as the `User-Agent` of every request.
pub const DEFAULT_USER_AGENT: &str =
    "wikidatasparqlexamples: https://github.com/SuLab/wikidatasparqlexamples";

/// Interactive viewer base used for deep links; the encoded query follows the fragment marker.
pub const DEFAULT_VIEWER_BASE: &str = "https://query.wikidata.org/#";

/// File extension of query definitions.
pub const DEFAULT_EXTENSION: &str = "sparql";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Namespace declarations prepended to every query before it is sent.
pub const WIKIDATA_PREFIXES: &str = "
PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX p: <http://www.wikidata.org/prop/>
PREFIX v: <http://www.wikidata.org/prop/statement/>
PREFIX q: <http://www.wikidata.org/prop/qualifier/>
PREFIX ps: <http://www.wikidata.org/prop/statement/>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
";

/// What the suite does when a test cannot run at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure as an errored test and continue with the next definition.
    #[default]
    Isolate,
    /// Stop the run and return the error.
    Abort,
}

/// Configuration for test execution and reporting.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub prefix: String,
    pub viewer_base: String,
    pub extension: String,
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub use_colors: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            prefix: WIKIDATA_PREFIXES.to_string(),
            viewer_base: DEFAULT_VIEWER_BASE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            failure_policy: FailurePolicy::default(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl HarnessConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
