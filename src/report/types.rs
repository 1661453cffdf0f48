use crate::runner::state::{RunSummary, TestReport};
use serde::{Deserialize, Serialize};

/// Suite results for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResults {
    pub session_id: String,
    pub tests: Vec<TestReport>,
    pub summary: RunSummary,
    pub generated_at: String,
}
