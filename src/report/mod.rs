pub mod allure;
pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use allure::AllureSink;

/// Kind of file handed to a reporting sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    Archive,
}

impl AttachmentKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            AttachmentKind::Image => "image/png",
            AttachmentKind::Video => "video/webm",
            AttachmentKind::Archive => "application/zip",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AttachmentKind::Image => "png",
            AttachmentKind::Video => "webm",
            AttachmentKind::Archive => "zip",
        }
    }
}

/// Destination for diagnostic attachments of the test currently running
pub trait ReportSink: Send + Sync {
    fn attach_file(&self, path: &Path, name: &str, kind: AttachmentKind) -> Result<()>;
}

/// Regenerate the JUnit report from a saved results file
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let results = std::fs::read_to_string(results_path)?;
    let suite_results: types::SuiteResults = serde_json::from_str(&results)?;

    match format {
        "json" => json::generate(&suite_results, output).await,
        "junit" => junit::generate(&suite_results, output).await,
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}
