//! Web driver implementation using Playwright
//!
//! One `PlaywrightAutomation::start` spawns one Playwright driver process.
//! Browsers, contexts and pages created from it are closed explicitly by the
//! lifecycle layer; the driver process ends when the engine is stopped.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use playwright::api::browser_type::RecordVideo;
use playwright::Playwright;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::trace::TraceRecorder;
use crate::driver::traits::{
    Automation, Browser, BrowserKind, Context, ContextOptions, Engine, Page, TraceOptions,
};

const CHECK_JS: &str = r#"sel => {
    const el = document.querySelector(sel);
    if (!el) return false;
    if (!el.checked) el.click();
    return el.checked;
}"#;

const SELECT_BY_LABEL_JS: &str = r#"([sel, label]) => {
    const el = document.querySelector(sel);
    if (!el) return false;
    const opt = Array.from(el.options).find(o => o.label.trim() === label || o.text.trim() === label);
    if (!opt) return false;
    el.value = opt.value;
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

/// Playwright-backed automation
#[derive(Debug, Clone, Default)]
pub struct PlaywrightAutomation;

impl PlaywrightAutomation {
    pub fn new() -> Self {
        Self
    }

    /// Download the browsers Playwright drives
    pub async fn install() -> Result<()> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;
        playwright
            .prepare()
            .context("Failed to install Playwright browsers")?;
        Ok(())
    }
}

#[async_trait]
impl Automation for PlaywrightAutomation {
    async fn start(&self) -> Result<Box<dyn Engine>> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;
        log::debug!("Playwright driver started");
        Ok(Box::new(PlaywrightEngine { playwright }))
    }
}

struct PlaywrightEngine {
    playwright: Playwright,
}

#[async_trait]
impl Engine for PlaywrightEngine {
    async fn launch(&self, kind: BrowserKind, headless: bool) -> Result<Box<dyn Browser>> {
        let browser_type = match kind {
            BrowserKind::Chromium => self.playwright.chromium(),
            BrowserKind::Firefox => self.playwright.firefox(),
            BrowserKind::Webkit => self.playwright.webkit(),
        };

        let browser = browser_type
            .launcher()
            .headless(headless)
            .launch()
            .await
            .with_context(|| format!("Failed to launch {}", kind.as_str()))?;

        Ok(Box::new(PlaywrightBrowser { browser }))
    }

    async fn stop(self: Box<Self>) -> Result<()> {
        // Dropping the handle terminates the driver process
        drop(self.playwright);
        log::debug!("Playwright driver stopped");
        Ok(())
    }
}

struct PlaywrightBrowser {
    browser: playwright::api::Browser,
}

#[async_trait]
impl Browser for PlaywrightBrowser {
    async fn new_context(&self, options: &ContextOptions) -> Result<Box<dyn Context>> {
        let context = match options.record_video_dir {
            Some(ref dir) => {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create video directory {}", dir.display())
                })?;
                self.browser
                    .context_builder()
                    .record_video(RecordVideo {
                        dir: dir.as_path(),
                        size: None,
                    })
                    .build()
                    .await?
            }
            None => self.browser.context_builder().build().await?,
        };

        Ok(Box::new(PlaywrightContext {
            context,
            trace: Arc::new(TraceRecorder::new()),
            pages: Mutex::new(Vec::new()),
        }))
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

struct PlaywrightContext {
    context: playwright::api::BrowserContext,
    trace: Arc<TraceRecorder>,
    pages: Mutex<Vec<Arc<PlaywrightPage>>>,
}

#[async_trait]
impl Context for PlaywrightContext {
    async fn start_tracing(&self, options: TraceOptions) -> Result<()> {
        self.trace.start(options)
    }

    async fn stop_tracing(&self, path: &Path) -> Result<()> {
        if self.trace.options().map_or(false, |o| o.sources) {
            let pages = self.pages.lock().await;
            for (i, page) in pages.iter().enumerate() {
                let html = page.page.lock().await.content().await;
                match html {
                    Ok(html) => self.trace.add_source(&format!("page-{}", i), html),
                    Err(e) => log::debug!("Could not read page source for trace: {}", e),
                }
            }
        }

        let actions = self.trace.stop(path)?;
        log::debug!("Trace with {} actions written to {}", actions, path.display());
        Ok(())
    }

    async fn new_page(&self) -> Result<Arc<dyn Page>> {
        let page = self.context.new_page().await?;
        let page = Arc::new(PlaywrightPage {
            page: Mutex::new(page),
            trace: self.trace.clone(),
        });
        self.pages.lock().await.push(page.clone());
        Ok(page)
    }

    async fn close(&self) -> Result<()> {
        self.pages.lock().await.clear();
        self.context.close().await?;
        Ok(())
    }
}

struct PlaywrightPage {
    page: Mutex<playwright::api::Page>,
    trace: Arc<TraceRecorder>,
}

impl PlaywrightPage {
    /// Record `action` in the trace, if one is running, and pass `result` through
    async fn traced<T>(&self, action: &str, detail: &str, result: Result<T>) -> Result<T> {
        if let Some(options) = self.trace.options() {
            let page = self.page.lock().await;
            let screenshot = if options.screenshots {
                page.screenshot_builder().screenshot().await.ok()
            } else {
                None
            };
            let snapshot = if options.snapshots {
                page.content().await.ok()
            } else {
                None
            };
            drop(page);

            let error = result.as_ref().err().map(|e| e.to_string());
            self.trace.record(action, detail, error, screenshot, snapshot);
        }
        result
    }

    async fn nth_element(
        &self,
        selector: &str,
        index: usize,
    ) -> Result<playwright::api::ElementHandle> {
        let page = self.page.lock().await;
        let elements = page.query_selector_all(selector).await?;
        elements
            .into_iter()
            .nth(index)
            .ok_or_else(|| anyhow::anyhow!("Element not found: {} at index {}", selector, index))
    }
}

#[async_trait]
impl Page for PlaywrightPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let result: Result<()> = async {
            let page = self.page.lock().await;
            page.goto_builder(url)
                .goto()
                .await
                .with_context(|| format!("Failed to navigate to {}", url))?;
            Ok(())
        }
        .await;
        self.traced("goto", url, result).await
    }

    async fn title(&self) -> Result<String> {
        let page = self.page.lock().await;
        Ok(page.title().await?)
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let result: Result<()> = async {
            let el = self.nth_element(selector, 0).await?;
            el.fill_builder(value).fill().await?;
            Ok(())
        }
        .await;
        self.traced("fill", selector, result).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let result: Result<()> = async {
            let page = self.page.lock().await;
            page.click_builder(selector)
                .click()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to click: {}. Error: {:?}", selector, e))
        }
        .await;
        self.traced("click", selector, result).await
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        let result: Result<()> = async {
            let el = self.nth_element(selector, index).await?;
            el.click_builder().click().await?;
            Ok(())
        }
        .await;
        self.traced("click", &format!("{} >> nth={}", selector, index), result)
            .await
    }

    async fn check(&self, selector: &str) -> Result<()> {
        let result: Result<()> = async {
            let page = self.page.lock().await;
            let checked: bool = page.evaluate(CHECK_JS, selector.to_string()).await?;
            if !checked {
                anyhow::bail!("Could not check element: {}", selector);
            }
            Ok(())
        }
        .await;
        self.traced("check", selector, result).await
    }

    async fn select_option(&self, selector: &str, label: &str) -> Result<()> {
        let result: Result<()> = async {
            let page = self.page.lock().await;
            let selected: bool = page
                .evaluate(
                    SELECT_BY_LABEL_JS,
                    (selector.to_string(), label.to_string()),
                )
                .await?;
            if !selected {
                anyhow::bail!("Option '{}' not found in {}", label, selector);
            }
            Ok(())
        }
        .await;
        self.traced("selectOption", &format!("{} = {}", selector, label), result)
            .await
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let page = self.page.lock().await;
        match page.query_selector(selector).await? {
            Some(el) => Ok(el.is_visible().await?),
            None => Ok(false),
        }
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        let page = self.page.lock().await;
        match page.query_selector(selector).await? {
            Some(el) => Ok(Some(el.inner_text().await?)),
            None => Ok(None),
        }
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let page = self.page.lock().await;
        let mut texts = Vec::new();
        for el in page.query_selector_all(selector).await? {
            texts.push(el.text_content().await?.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let page = self.page.lock().await;
        Ok(page.query_selector_all(selector).await?.len())
    }

    async fn screenshot(&self, path: &Path, full_page: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let page = self.page.lock().await;
        page.screenshot_builder()
            .full_page(full_page)
            .path(path.to_path_buf())
            .screenshot()
            .await?;
        Ok(())
    }

    async fn video_path(&self) -> Result<Option<PathBuf>> {
        let page = self.page.lock().await;
        match page.video()? {
            Some(video) => Ok(Some(video.path()?)),
            None => Ok(None),
        }
    }
}
