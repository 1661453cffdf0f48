use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::state::{TestOutcome, TestStatus};
use crate::driver::traits::{Context, Page};
use crate::report::{AttachmentKind, ReportSink};
use crate::utils::config::RunConfiguration;

/// Kind of diagnostic file produced for a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Screenshot,
    Trace,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Deterministic artifact locations under the reports root
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("videos")
    }

    pub fn screenshot_path(&self, test_name: &str) -> PathBuf {
        self.root
            .join("screenshots")
            .join(format!("{}.png", safe_name(test_name)))
    }

    pub fn trace_path(&self, test_name: &str) -> PathBuf {
        self.root
            .join("traces")
            .join(format!("{}_trace.zip", safe_name(test_name)))
    }

    pub fn allure_results_dir(&self) -> PathBuf {
        self.root.join("allure-results")
    }
}

/// Test names become file names; path separators are not allowed
pub fn safe_name(test_name: &str) -> String {
    test_name.replace(['/', '\\'], "_")
}

/// Post-test capture of trace, screenshot and video.
///
/// `call_outcome` is the body's recorded outcome; only a failed call counts
/// as a failure. Each step is independent: an error in one is logged and the
/// next still runs.
pub async fn capture(
    context: &dyn Context,
    page: &dyn Page,
    tracing_started: bool,
    call_outcome: Option<TestOutcome>,
    config: &RunConfiguration,
    layout: &ArtifactLayout,
    sink: &dyn ReportSink,
    test_name: &str,
) -> Vec<ArtifactRecord> {
    let test_failed = matches!(call_outcome, Some(o) if o.status == TestStatus::Failed);
    log::info!(
        "Test '{}' result: {}",
        test_name,
        if test_failed { "FAIL" } else { "PASS" }
    );

    let mut artifacts = Vec::new();

    if tracing_started {
        let path = layout.trace_path(test_name);
        match context.stop_tracing(&path).await {
            Ok(()) => {
                log::info!("Trace saved: {}", path.display());
                // Archive attachments are not supported by the sink yet
                artifacts.push(ArtifactRecord {
                    kind: ArtifactKind::Trace,
                    path,
                });
            }
            Err(e) => log::warn!("Failed to save trace for '{}': {:#}", test_name, e),
        }
    }

    if test_failed && config.screenshot.captures_on_failure() {
        let path = layout.screenshot_path(test_name);
        match page.screenshot(&path, true).await {
            Ok(()) => {
                log::info!("Screenshot saved: {}", path.display());
                let name = format!("{}_screenshot", test_name);
                match sink.attach_file(&path, &name, AttachmentKind::Image) {
                    Ok(()) => log::info!("Screenshot attached to report"),
                    Err(e) => log::warn!("Failed to attach screenshot: {:#}", e),
                }
                artifacts.push(ArtifactRecord {
                    kind: ArtifactKind::Screenshot,
                    path,
                });
            }
            Err(e) => log::warn!("Failed to take screenshot for '{}': {:#}", test_name, e),
        }
    }

    if test_failed && config.video.records() {
        match page.video_path().await {
            Ok(Some(path)) if path.exists() => {
                let name = format!("{}_video", test_name);
                match sink.attach_file(&path, &name, AttachmentKind::Video) {
                    Ok(()) => {
                        log::info!("Video attached to report");
                        artifacts.push(ArtifactRecord {
                            kind: ArtifactKind::Video,
                            path,
                        });
                    }
                    Err(e) => log::warn!("Failed to attach video: {:#}", e),
                }
            }
            Ok(_) => log::debug!("No recorded video for '{}'", test_name),
            Err(e) => log::warn!("Failed to resolve video for '{}': {:#}", test_name, e),
        }
    }

    artifacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths_are_deterministic() {
        let layout = ArtifactLayout::new("reports");
        assert_eq!(layout.videos_dir(), PathBuf::from("reports/videos"));
        assert_eq!(
            layout.screenshot_path("test_valid_user_login"),
            PathBuf::from("reports/screenshots/test_valid_user_login.png")
        );
        assert_eq!(
            layout.trace_path("test_valid_user_login"),
            PathBuf::from("reports/traces/test_valid_user_login_trace.zip")
        );
    }

    #[test]
    fn test_safe_name_strips_separators() {
        assert_eq!(
            safe_name("test_login_data_driven[a/b\\c]"),
            "test_login_data_driven[a_b_c]"
        );
    }
}
