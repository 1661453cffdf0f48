//! Allure results directory writer
//!
//! Produces the file layout the Allure command line reads:
//! `{uuid}-result.json` per test and `{uuid}-attachment.{ext}` per file.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{AttachmentKind, ReportSink};
use crate::runner::state::TestStatus;

#[derive(Debug, Clone, Serialize)]
pub struct AllureAttachment {
    pub name: String,
    pub source: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllureLabel {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllureStatusDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllureResult {
    pub uuid: String,
    pub history_id: String,
    pub name: String,
    pub full_name: String,
    pub status: String,
    pub status_details: AllureStatusDetails,
    pub stage: String,
    pub start: i64,
    pub stop: i64,
    pub labels: Vec<AllureLabel>,
    pub attachments: Vec<AllureAttachment>,
}

/// Reporting sink backed by an Allure results directory
pub struct AllureSink {
    results_dir: PathBuf,
    current: Mutex<Option<AllureResult>>,
}

impl AllureSink {
    pub fn new(results_dir: impl Into<PathBuf>) -> Result<Self> {
        let results_dir = results_dir.into();
        std::fs::create_dir_all(&results_dir)
            .with_context(|| format!("Failed to create {}", results_dir.display()))?;
        Ok(Self {
            results_dir,
            current: Mutex::new(None),
        })
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Open a result for `name`. Attachments go to it until it is finished.
    pub fn start_test(&self, name: &str, tags: &[&str]) -> Result<()> {
        let mut labels = vec![
            AllureLabel {
                name: "suite".to_string(),
                value: "storefront".to_string(),
            },
            AllureLabel {
                name: "framework".to_string(),
                value: env!("CARGO_PKG_NAME").to_string(),
            },
        ];
        labels.extend(tags.iter().map(|t| AllureLabel {
            name: "tag".to_string(),
            value: t.to_string(),
        }));

        let result = AllureResult {
            uuid: uuid::Uuid::new_v4().to_string(),
            history_id: name.to_string(),
            name: name.to_string(),
            full_name: format!("storefront.{}", name),
            status: "unknown".to_string(),
            status_details: AllureStatusDetails { message: None },
            stage: "running".to_string(),
            start: chrono::Utc::now().timestamp_millis(),
            stop: 0,
            labels,
            attachments: Vec::new(),
        };

        let mut current = self.lock()?;
        if let Some(previous) = current.replace(result) {
            log::warn!("Result for '{}' was never finished", previous.name);
        }
        Ok(())
    }

    /// Close the open result and write it to disk
    pub fn finish_test(&self, status: TestStatus, message: Option<String>) -> Result<PathBuf> {
        let mut result = self
            .lock()?
            .take()
            .ok_or_else(|| anyhow!("No test result in progress"))?;

        result.status = status.as_str().to_string();
        result.status_details.message = message;
        result.stage = "finished".to_string();
        result.stop = chrono::Utc::now().timestamp_millis();

        let path = self.results_dir.join(format!("{}-result.json", result.uuid));
        std::fs::write(&path, serde_json::to_string_pretty(&result)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<AllureResult>>> {
        self.current
            .lock()
            .map_err(|_| anyhow!("Allure result lock poisoned"))
    }
}

impl ReportSink for AllureSink {
    fn attach_file(&self, path: &Path, name: &str, kind: AttachmentKind) -> Result<()> {
        if kind == AttachmentKind::Archive {
            log::debug!("Archive attachments are not reported: {}", path.display());
            return Ok(());
        }

        let mut current = self.lock()?;
        let result = current
            .as_mut()
            .ok_or_else(|| anyhow!("No test result in progress for attachment '{}'", name))?;

        let source = format!("{}-attachment.{}", uuid::Uuid::new_v4(), kind.extension());
        std::fs::copy(path, self.results_dir.join(&source))
            .with_context(|| format!("Failed to copy {}", path.display()))?;

        result.attachments.push(AllureAttachment {
            name: name.to_string(),
            source,
            mime_type: kind.mime_type().to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_is_copied_and_listed() {
        let dir = tempfile::tempdir().unwrap();
        let sink = AllureSink::new(dir.path().join("allure-results")).unwrap();
        let shot = dir.path().join("shot.png");
        std::fs::write(&shot, b"png").unwrap();

        sink.start_test("test_add_product_to_cart", &["sanity"]).unwrap();
        sink.attach_file(&shot, "test_add_product_to_cart_screenshot", AttachmentKind::Image)
            .unwrap();
        let result_path = sink
            .finish_test(TestStatus::Failed, Some("cart empty".into()))
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(result_path).unwrap()).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["statusDetails"]["message"], "cart empty");
        assert_eq!(json["attachments"][0]["type"], "image/png");
        assert_eq!(
            json["attachments"][0]["name"],
            "test_add_product_to_cart_screenshot"
        );

        let source = json["attachments"][0]["source"].as_str().unwrap();
        assert!(source.ends_with("-attachment.png"));
        assert_eq!(std::fs::read(sink.results_dir().join(source)).unwrap(), b"png");
    }

    #[test]
    fn test_archive_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let sink = AllureSink::new(dir.path()).unwrap();
        sink.start_test("t", &[]).unwrap();
        sink.attach_file(Path::new("/does/not/exist.zip"), "t_trace", AttachmentKind::Archive)
            .unwrap();
        let path = sink.finish_test(TestStatus::Passed, None).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["attachments"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_attach_without_open_result_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sink = AllureSink::new(dir.path()).unwrap();
        let file = dir.path().join("v.webm");
        std::fs::write(&file, b"webm").unwrap();
        assert!(sink.attach_file(&file, "v", AttachmentKind::Video).is_err());
        assert!(sink.finish_test(TestStatus::Passed, None).is_err());
    }
}
