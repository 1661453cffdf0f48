//! Action trace recorder for the Playwright backend
//!
//! The Rust Playwright bindings expose no tracing API, so the backend keeps
//! its own timeline: each page action is recorded with an optional
//! screenshot and DOM snapshot, and the whole session is written out as a
//! zip archive when tracing stops.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use crate::driver::traits::TraceOptions;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceAction {
    pub index: usize,
    pub action: String,
    pub detail: String,
    pub elapsed_ms: u64,
    pub error: Option<String>,
    pub screenshot: Option<String>,
    pub snapshot: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceManifest<'a> {
    started_at: String,
    stopped_at: String,
    screenshots: bool,
    snapshots: bool,
    sources: bool,
    actions: &'a [TraceAction],
}

struct TraceSession {
    options: TraceOptions,
    started_at: DateTime<Utc>,
    clock: Instant,
    actions: Vec<TraceAction>,
    files: Vec<(String, Vec<u8>)>,
}

/// Shared between a context and the pages it creates
#[derive(Default)]
pub struct TraceRecorder {
    session: Mutex<Option<TraceSession>>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, options: TraceOptions) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("trace recorder lock poisoned"))?;
        if guard.is_some() {
            anyhow::bail!("Tracing has already been started");
        }
        *guard = Some(TraceSession {
            options,
            started_at: Utc::now(),
            clock: Instant::now(),
            actions: Vec::new(),
            files: Vec::new(),
        });
        Ok(())
    }

    /// Options of the running session, `None` when not tracing
    pub fn options(&self) -> Option<TraceOptions> {
        self.session
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.options))
    }

    pub fn record(
        &self,
        action: &str,
        detail: &str,
        error: Option<String>,
        screenshot: Option<Vec<u8>>,
        snapshot: Option<String>,
    ) {
        let Ok(mut guard) = self.session.lock() else {
            return;
        };
        let Some(session) = guard.as_mut() else {
            return;
        };

        let index = session.actions.len();
        let screenshot_name = screenshot.map(|bytes| {
            let name = format!("screenshots/{:04}.png", index);
            session.files.push((name.clone(), bytes));
            name
        });
        let snapshot_name = snapshot.map(|html| {
            let name = format!("snapshots/{:04}.html", index);
            session.files.push((name.clone(), html.into_bytes()));
            name
        });

        session.actions.push(TraceAction {
            index,
            action: action.to_string(),
            detail: detail.to_string(),
            elapsed_ms: session.clock.elapsed().as_millis() as u64,
            error,
            screenshot: screenshot_name,
            snapshot: snapshot_name,
        });
    }

    /// Attach a page source captured at stop time
    pub fn add_source(&self, name: &str, html: String) {
        if let Ok(mut guard) = self.session.lock() {
            if let Some(session) = guard.as_mut() {
                session
                    .files
                    .push((format!("sources/{}.html", name), html.into_bytes()));
            }
        }
    }

    /// End the session and write it to `path` as a zip archive.
    /// Returns the number of recorded actions.
    pub fn stop(&self, path: &Path) -> Result<usize> {
        let session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("trace recorder lock poisoned"))?
            .take()
            .ok_or_else(|| anyhow::anyhow!("Tracing was not started"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manifest = TraceManifest {
            started_at: session.started_at.to_rfc3339(),
            stopped_at: Utc::now().to_rfc3339(),
            screenshots: session.options.screenshots,
            snapshots: session.options.snapshots,
            sources: session.options.sources,
            actions: &session.actions,
        };

        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create trace archive {}", path.display()))?;
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("trace.json", options)?;
        zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;

        for (name, bytes) in &session.files {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes)?;
        }
        zip.finish()?;

        Ok(session.actions.len())
    }
}
