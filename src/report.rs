//! Report tables.
//!
//! [`ReportBuilder`] flattens suite outcomes into display rows, one per outcome,
//! in run order. Rows are rebuilt on every call and carry no identity beyond
//! their position.

use serde::Serialize;

use crate::suite::TestOutcome;

/// Column headers, in row order.
pub const COLUMNS: [&str; 7] = [
    "Query Name",
    "Query Description",
    "Validator",
    "Validator Description",
    "Test Status",
    "Result Message",
    "URL",
];

/// Status of one report row.
///
/// `Fail` means the validator rejected the results; `Error` means the query
/// could not be run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Pass => "Pass",
            TestStatus::Fail => "Fail",
            TestStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Query Name")]
    pub name: String,
    #[serde(rename = "Query Description")]
    pub description: String,
    #[serde(rename = "Validator")]
    pub validator: String,
    #[serde(rename = "Validator Description")]
    pub validator_description: String,
    #[serde(rename = "Test Status")]
    pub status: TestStatus,
    #[serde(rename = "Result Message")]
    pub message: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl ReportRow {
    /// Cell values in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 7] {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.validator.as_str(),
            self.validator_description.as_str(),
            self.status.as_str(),
            self.message.as_str(),
            self.url.as_str(),
        ]
    }
}

impl From<&TestOutcome> for ReportRow {
    fn from(outcome: &TestOutcome) -> Self {
        match outcome {
            TestOutcome::Completed(result) => Self {
                name: result.name.clone(),
                description: result.description.clone(),
                validator: result.validator.clone(),
                validator_description: result.outcome.description.clone(),
                status: if result.outcome.success {
                    TestStatus::Pass
                } else {
                    TestStatus::Fail
                },
                message: result.outcome.message.clone(),
                url: result.url.clone(),
            },
            TestOutcome::Errored {
                name,
                description,
                validator,
                validator_description,
                url,
                error,
            } => Self {
                name: name.clone(),
                description: description.clone(),
                validator: validator.clone(),
                validator_description: validator_description.clone(),
                status: TestStatus::Error,
                message: error.to_string(),
                url: url.clone(),
            },
        }
    }
}

/// Pass/fail/error counts over a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl ReportSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }
}

/// Ordered report rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |status: TestStatus| self.rows.iter().filter(|r| r.status == status).count();
        ReportSummary {
            total: self.rows.len(),
            passed: count(TestStatus::Pass),
            failed: count(TestStatus::Fail),
            errored: count(TestStatus::Error),
        }
    }

    /// Rows with the URL wrapped as a `[<url> Run]` link label for publishing.
    pub fn publish_rows(&self) -> Vec<ReportRow> {
        self.rows
            .iter()
            .cloned()
            .map(|mut row| {
                row.url = link_label(&row.url);
                row
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Wraps a URL as an external link labelled `Run`.
pub fn link_label(url: &str) -> String {
    format!("[{} Run]", url)
}

/// Projects suite outcomes into a report table.
#[derive(Debug, Default)]
pub struct ReportBuilder;

impl ReportBuilder {
    pub fn build(outcomes: &[TestOutcome]) -> ReportTable {
        ReportTable {
            rows: outcomes.iter().map(ReportRow::from).collect(),
        }
    }
}
