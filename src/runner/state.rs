use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::artifacts::ArtifactRecord;

/// Part of a test's lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Call => "call",
            Phase::Teardown => "teardown",
        }
    }
}

/// Result of one phase, or of a whole test
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
        }
    }
}

/// Recorded outcome of one phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestOutcome {
    pub phase: Phase,
    pub status: TestStatus,
}

/// Report entry for one finished test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub error: Option<String>,
    #[serde(default)]
    pub teardown_error: Option<String>,
    #[serde(default)]
    pub phases: Vec<TestOutcome>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub session_id: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total_duration_ms: Option<u64>,
}

/// State of a suite run
#[derive(Debug, Clone)]
pub struct SuiteState {
    pub session_id: String,
    pub tests: Vec<TestReport>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl SuiteState {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            tests: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn add_test(&mut self, report: TestReport) {
        self.tests.push(report);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Instant::now());
    }

    pub fn has_failures(&self) -> bool {
        self.tests.iter().any(|t| t.status == TestStatus::Failed)
    }

    pub fn summary(&self) -> RunSummary {
        let (passed, failed, skipped) =
            self.tests
                .iter()
                .fold((0, 0, 0), |(p, f, s), t| match t.status {
                    TestStatus::Passed => (p + 1, f, s),
                    TestStatus::Failed => (p, f + 1, s),
                    TestStatus::Skipped => (p, f, s + 1),
                });

        let total_duration_ms = self.started_at.map(|start| {
            self.finished_at
                .unwrap_or_else(Instant::now)
                .duration_since(start)
                .as_millis() as u64
        });

        RunSummary {
            session_id: self.session_id.clone(),
            total: self.tests.len() as u32,
            passed,
            failed,
            skipped,
            total_duration_ms,
        }
    }

    /// Serialize state for reporting
    pub fn to_results(&self) -> crate::report::types::SuiteResults {
        crate::report::types::SuiteResults {
            session_id: self.session_id.clone(),
            tests: self.tests.clone(),
            summary: self.summary(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, status: TestStatus) -> TestReport {
        TestReport {
            name: name.to_string(),
            tags: vec![],
            status,
            duration_ms: 10,
            error: None,
            teardown_error: None,
            phases: vec![],
            artifacts: vec![],
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut state = SuiteState::new("s1");
        state.start();
        state.add_test(report("a", TestStatus::Passed));
        state.add_test(report("b", TestStatus::Failed));
        state.add_test(report("c", TestStatus::Skipped));
        state.add_test(report("d", TestStatus::Passed));
        state.finish();

        let summary = state.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.total_duration_ms.is_some());
        assert!(state.has_failures());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&TestOutcome {
            phase: Phase::Call,
            status: TestStatus::Failed,
        })
        .unwrap();
        assert_eq!(json, r#"{"phase":"call","status":"failed"}"#);
    }
}
