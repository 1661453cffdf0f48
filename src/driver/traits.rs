use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::FixtureError;

/// Browser variant to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            _ => Err(FixtureError::UnsupportedBrowser(s.to_string())),
        }
    }
}

/// Options fixed at context creation
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    /// Directory videos are recorded into. `None` disables recording.
    pub record_video_dir: Option<PathBuf>,
}

/// What an action trace captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    pub screenshots: bool,
    pub snapshots: bool,
    pub sources: bool,
}

impl TraceOptions {
    pub fn full() -> Self {
        Self {
            screenshots: true,
            snapshots: true,
            sources: true,
        }
    }
}

/// Entry point of an automation backend
///
/// Each call to [`Automation::start`] starts a fresh engine process. Engines
/// are never shared between tests.
#[async_trait]
pub trait Automation: Send + Sync {
    async fn start(&self) -> Result<Box<dyn Engine>>;
}

/// A running automation engine
#[async_trait]
pub trait Engine: Send + Sync {
    /// Launch a browser of the given kind
    async fn launch(&self, kind: BrowserKind, headless: bool) -> Result<Box<dyn Browser>>;

    /// Stop the engine process
    async fn stop(self: Box<Self>) -> Result<()>;
}

/// A launched browser process
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_context(&self, options: &ContextOptions) -> Result<Box<dyn Context>>;

    async fn close(&self) -> Result<()>;
}

/// An isolated browsing session
#[async_trait]
pub trait Context: Send + Sync {
    async fn start_tracing(&self, options: TraceOptions) -> Result<()>;

    /// Stop tracing and write the archive to `path`
    async fn stop_tracing(&self, path: &Path) -> Result<()>;

    async fn new_page(&self) -> Result<Arc<dyn Page>>;

    async fn close(&self) -> Result<()>;
}

/// A navigable page
///
/// Selectors are Playwright selector strings (CSS, `text=`, `:has-text()`).
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    async fn title(&self) -> Result<String>;

    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// Click the `index`-th (0-based) match of `selector`
    async fn click_nth(&self, selector: &str, index: usize) -> Result<()>;

    async fn check(&self, selector: &str) -> Result<()>;

    /// Select the option whose visible label equals `label`
    async fn select_option(&self, selector: &str, label: &str) -> Result<()>;

    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Inner text of the first match, `None` when nothing matches
    async fn text(&self, selector: &str) -> Result<Option<String>>;

    /// Text content of every match, in document order
    async fn texts(&self, selector: &str) -> Result<Vec<String>>;

    async fn count(&self, selector: &str) -> Result<usize>;

    async fn screenshot(&self, path: &Path, full_page: bool) -> Result<()>;

    /// Path of the video bound to this page, if its context records one
    async fn video_path(&self) -> Result<Option<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_kind_parse() {
        assert_eq!("chromium".parse::<BrowserKind>().unwrap(), BrowserKind::Chromium);
        assert_eq!("Firefox".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
        assert_eq!(" webkit ".parse::<BrowserKind>().unwrap(), BrowserKind::Webkit);
        assert!(matches!(
            "edge".parse::<BrowserKind>(),
            Err(FixtureError::UnsupportedBrowser(_))
        ));
    }
}
