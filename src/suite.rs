//! Suite discovery and sequential execution.
//!
//! The suite flow:
//! 1. List definition files in a directory through a [`DefinitionLister`]
//! 2. Read and parse each file into a [`QueryDefinition`]
//! 3. Build one [`TestCase`] per definition, resolving validators eagerly
//! 4. Run the cases one after another and collect a [`TestOutcome`] for each

use std::path::{Path, PathBuf};

use tracing::{error, info};
use walkdir::WalkDir;

use crate::case::{TestCase, TestResult};
use crate::config::{FailurePolicy, HarnessConfig};
use crate::definition::QueryDefinition;
use crate::diagnostics::{HarnessError, HarnessResult};
use crate::executor::QueryExecutor;
use crate::validators::ValidatorRegistry;

/// Lists the definition files of a directory.
pub trait DefinitionLister {
    fn list(&self, dir: &Path) -> HarnessResult<Vec<PathBuf>>;
}

/// Lists files with a given extension directly inside a directory.
///
/// Files come back in file-name order; subdirectories are not searched.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    extension: String,
}

impl DirectoryLister {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
    }
}

impl DefinitionLister for DirectoryLister {
    fn list(&self, dir: &Path) -> HarnessResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                HarnessError::io(path, io)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.has_extension(entry.path()) {
                continue;
            }
            files.push(entry.path().to_path_buf());
        }
        Ok(files)
    }
}

/// Result of running one test case.
#[derive(Debug)]
pub enum TestOutcome {
    /// The query ran and the validator produced an outcome, pass or fail.
    Completed(TestResult),
    /// The query could not run at all.
    Errored {
        name: String,
        description: String,
        validator: String,
        validator_description: String,
        url: String,
        error: HarnessError,
    },
}

impl TestOutcome {
    pub fn name(&self) -> &str {
        match self {
            TestOutcome::Completed(result) => &result.name,
            TestOutcome::Errored { name, .. } => name,
        }
    }

    pub fn result(&self) -> Option<&TestResult> {
        match self {
            TestOutcome::Completed(result) => Some(result),
            TestOutcome::Errored { .. } => None,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.result().is_some_and(|r| r.outcome.success)
    }
}

/// An ordered set of test cases built from one directory.
#[derive(Debug)]
pub struct TestSuite {
    cases: Vec<TestCase>,
    failure_policy: FailurePolicy,
}

impl TestSuite {
    /// Discovers definitions in `dir` and builds a case for each, in listing order.
    ///
    /// The first definition naming an unknown validator aborts construction with
    /// its configuration error; no query has been sent at that point.
    pub fn discover(
        dir: &Path,
        lister: &dyn DefinitionLister,
        registry: &ValidatorRegistry,
        config: &HarnessConfig,
    ) -> HarnessResult<Self> {
        let paths = lister.list(dir)?;
        info!(dir = %dir.display(), count = paths.len(), "discovered definitions");
        let definitions = paths
            .iter()
            .map(QueryDefinition::from_file)
            .collect::<HarnessResult<Vec<_>>>()?;
        Self::from_definitions(definitions, registry, config)
    }

    /// Builds a suite from already loaded definitions, keeping their order.
    pub fn from_definitions(
        definitions: Vec<QueryDefinition>,
        registry: &ValidatorRegistry,
        config: &HarnessConfig,
    ) -> HarnessResult<Self> {
        let cases = definitions
            .into_iter()
            .map(|definition| {
                TestCase::new(definition, registry, &config.prefix)
                    .map(|case| case.with_viewer_base(&config.viewer_base))
            })
            .collect::<HarnessResult<Vec<_>>>()?;
        Ok(Self {
            cases,
            failure_policy: config.failure_policy,
        })
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Runs every case in order.
    ///
    /// Under [`FailurePolicy::Isolate`] a transport or shape error becomes an
    /// [`TestOutcome::Errored`] entry and the run continues. Under
    /// [`FailurePolicy::Abort`] the first such error is returned.
    pub fn run(&self, executor: &dyn QueryExecutor) -> HarnessResult<Vec<TestOutcome>> {
        let mut outcomes = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            match case.run(executor) {
                Ok(result) => outcomes.push(TestOutcome::Completed(result)),
                Err(err) if self.failure_policy == FailurePolicy::Isolate => {
                    error!("{}: {} error: {}", case.name(), err.kind(), err);
                    outcomes.push(TestOutcome::Errored {
                        name: case.name().to_string(),
                        description: case.definition().description().to_string(),
                        validator: case.validator_name().to_string(),
                        validator_description: case.validator_description().to_string(),
                        url: case.link(),
                        error: err,
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::StaticExecutor;
    use crate::registry::build_default_validator_registry;
    use std::fs;

    #[test]
    fn directory_lister_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.sparql"), "SELECT 1").unwrap();
        fs::write(dir.path().join("a.sparql"), "SELECT 2").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore").unwrap();
        fs::create_dir(dir.path().join("nested.sparql")).unwrap();
        fs::write(dir.path().join("nested.sparql").join("c.sparql"), "SELECT 3").unwrap();

        let files = DirectoryLister::new("sparql").list(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.sparql", "b.sparql"]);
    }

    #[test]
    fn directory_lister_reports_missing_directory() {
        let err = DirectoryLister::new("sparql")
            .list(Path::new("no/such/dir"))
            .unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn run_isolates_shape_errors() {
        let registry = build_default_validator_registry();
        let suite = TestSuite::from_definitions(
            vec![
                QueryDefinition::from_source("one.sparql", "SELECT 1"),
                QueryDefinition::from_source("two.sparql", "SELECT 2"),
            ],
            &registry,
            &HarnessConfig::default(),
        )
        .unwrap();
        let executor = StaticExecutor::new(serde_json::json!({"unexpected": {}}));
        let outcomes = suite.run(&executor).unwrap();
        assert_eq!(executor.calls(), 2);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result().is_none()));
    }

    #[test]
    fn run_aborts_under_abort_policy() {
        let registry = build_default_validator_registry();
        let config = HarnessConfig::default().with_failure_policy(FailurePolicy::Abort);
        let suite = TestSuite::from_definitions(
            vec![
                QueryDefinition::from_source("one.sparql", "SELECT 1"),
                QueryDefinition::from_source("two.sparql", "SELECT 2"),
            ],
            &registry,
            &config,
        )
        .unwrap();
        let executor = StaticExecutor::new(serde_json::json!({"unexpected": {}}));
        let err = suite.run(&executor).unwrap_err();
        assert_eq!(err.kind(), "response shape");
        assert_eq!(executor.calls(), 1);
    }
}
