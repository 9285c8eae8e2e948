//! Conformance report types: results, severity levels, and report aggregation.

use serde::Serialize;

/// Severity level of a conformance check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check identified a warning (non-blocking).
    Warning,
    /// The check failed (blocks conformance).
    Failure,
}

impl Severity {
    /// Tag printed in front of each result line.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single conformance check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    /// Short identifier of the validator that produced this result.
    pub validator: String,
    /// View the element set was built for; `None` for the unscoped graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Offending element ids or other detail lines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl TestResult {
    fn new(validator: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            validator: validator.into(),
            view: None,
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// Creates a passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Pass)
    }

    /// Creates a failure result.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Failure)
    }

    /// Creates a failure result with additional detail lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::new(validator, message, Severity::Failure)
        }
    }

    /// Creates a warning result.
    pub fn warn(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Warning)
    }

    /// Passes when `offenders` is empty, otherwise fails listing them.
    pub fn from_offenders(
        validator: &str,
        passed: impl Into<String>,
        failed: impl Into<String>,
        offenders: Vec<String>,
    ) -> Self {
        if offenders.is_empty() {
            Self::pass(validator, passed)
        } else {
            Self::fail_with_details(validator, failed, offenders)
        }
    }

    /// Returns true if this result represents a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated conformance report from all validators.
#[derive(Debug, Default, Serialize)]
pub struct ConformanceReport {
    /// All individual test results across all validators.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Extends this report with results from another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Extends this report, tagging every incoming result with `view`.
    pub fn extend_for_view(&mut self, view: Option<&str>, other: ConformanceReport) {
        self.results.extend(other.results.into_iter().map(|mut r| {
            r.view = view.map(str::to_string);
            r
        }));
    }

    /// Returns the count of failed checks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns the count of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    /// Returns true if all checks passed (no failures).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}
