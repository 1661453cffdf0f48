//! In-process automation backend for lifecycle tests
//!
//! Counts every handle it hands out, writes real artifact files, and serves
//! a scripted DOM so page objects can be driven without a browser.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use storefront_e2e::driver::traits::{
    Automation, Browser, BrowserKind, Context, ContextOptions, Engine, Page, TraceOptions,
};
use storefront_e2e::report::{AttachmentKind, ReportSink};
use storefront_e2e::utils::config::{Overrides, ProjectConfig, RunConfiguration};

pub const BASE_URL: &str = "https://store.test/";

#[derive(Debug, Default)]
pub struct Counters {
    pub engines_started: AtomicUsize,
    pub engines_live: AtomicIsize,
    pub browsers_launched: AtomicUsize,
    pub browsers_live: AtomicIsize,
    pub contexts_created: AtomicUsize,
    pub contexts_live: AtomicIsize,
    pub pages_created: AtomicUsize,
    pub pages_live: AtomicIsize,
    pub traces_started: AtomicUsize,
    pub screenshots: AtomicUsize,
    pub launches: Mutex<Vec<(BrowserKind, bool)>>,
    pub video_dirs: Mutex<Vec<Option<PathBuf>>>,
}

impl Counters {
    pub fn live(&self) -> (isize, isize, isize, isize) {
        (
            self.engines_live.load(Ordering::SeqCst),
            self.browsers_live.load(Ordering::SeqCst),
            self.contexts_live.load(Ordering::SeqCst),
            self.pages_live.load(Ordering::SeqCst),
        )
    }

    pub fn contexts_created(&self) -> usize {
        self.contexts_created.load(Ordering::SeqCst)
    }

    pub fn browsers_launched(&self) -> usize {
        self.browsers_launched.load(Ordering::SeqCst)
    }
}

/// Failure switches for the fake backend
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    pub fail_launch: bool,
    pub fail_new_context: bool,
    pub fail_screenshot: bool,
    pub fail_stop_tracing: bool,
    pub fail_context_close: bool,
    /// Write a video file for every page of a recording context
    pub write_video: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub visible: bool,
    pub texts: Vec<String>,
}

/// Page state shared by every page the backend creates
#[derive(Debug, Default)]
pub struct FakeDom {
    pub title: Mutex<String>,
    pub elements: Mutex<HashMap<String, FakeElement>>,
    pub broken: Mutex<HashSet<String>>,
    pub actions: Mutex<Vec<String>>,
}

impl FakeDom {
    pub fn new() -> Arc<Self> {
        let dom = Self::default();
        *dom.title.lock().unwrap() = "Your Store".to_string();
        Arc::new(dom)
    }

    pub fn show(&self, selector: &str) {
        self.elements
            .lock()
            .unwrap()
            .entry(selector.to_string())
            .or_default()
            .visible = true;
    }

    pub fn set_texts(&self, selector: &str, texts: &[&str]) {
        let mut elements = self.elements.lock().unwrap();
        let el = elements.entry(selector.to_string()).or_default();
        el.visible = true;
        el.texts = texts.iter().map(|t| t.to_string()).collect();
    }

    pub fn set_title(&self, title: &str) {
        *self.title.lock().unwrap() = title.to_string();
    }

    /// Interactions with `selector` fail from now on
    pub fn break_selector(&self, selector: &str) {
        self.broken.lock().unwrap().insert(selector.to_string());
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn act(&self, selector: &str, action: String) -> Result<()> {
        if self.broken.lock().unwrap().contains(selector) {
            bail!("Element not found: {}", selector);
        }
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeAutomation {
    pub counters: Arc<Counters>,
    pub behavior: Behavior,
    pub dom: Arc<FakeDom>,
}

impl FakeAutomation {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            behavior,
            dom: FakeDom::new(),
        }
    }
}

#[async_trait]
impl Automation for FakeAutomation {
    async fn start(&self) -> Result<Box<dyn Engine>> {
        self.counters.engines_started.fetch_add(1, Ordering::SeqCst);
        self.counters.engines_live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeEngine {
            automation: self.clone(),
        }))
    }
}

struct FakeEngine {
    automation: FakeAutomation,
}

#[async_trait]
impl Engine for FakeEngine {
    async fn launch(&self, kind: BrowserKind, headless: bool) -> Result<Box<dyn Browser>> {
        let counters = &self.automation.counters;
        counters.launches.lock().unwrap().push((kind, headless));
        if self.automation.behavior.fail_launch {
            bail!("browser executable missing");
        }
        counters.browsers_launched.fetch_add(1, Ordering::SeqCst);
        counters.browsers_live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeBrowser {
            automation: self.automation.clone(),
        }))
    }

    async fn stop(self: Box<Self>) -> Result<()> {
        self.automation
            .counters
            .engines_live
            .fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeBrowser {
    automation: FakeAutomation,
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn new_context(&self, options: &ContextOptions) -> Result<Box<dyn Context>> {
        if self.automation.behavior.fail_new_context {
            bail!("context creation refused");
        }
        let counters = &self.automation.counters;
        counters.contexts_created.fetch_add(1, Ordering::SeqCst);
        counters.contexts_live.fetch_add(1, Ordering::SeqCst);
        counters
            .video_dirs
            .lock()
            .unwrap()
            .push(options.record_video_dir.clone());
        Ok(Box::new(FakeContext {
            automation: self.automation.clone(),
            video_dir: options.record_video_dir.clone(),
            tracing: Mutex::new(None),
        }))
    }

    async fn close(&self) -> Result<()> {
        self.automation
            .counters
            .browsers_live
            .fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeContext {
    automation: FakeAutomation,
    video_dir: Option<PathBuf>,
    tracing: Mutex<Option<TraceOptions>>,
}

#[async_trait]
impl Context for FakeContext {
    async fn start_tracing(&self, options: TraceOptions) -> Result<()> {
        self.automation
            .counters
            .traces_started
            .fetch_add(1, Ordering::SeqCst);
        *self.tracing.lock().unwrap() = Some(options);
        Ok(())
    }

    async fn stop_tracing(&self, path: &Path) -> Result<()> {
        if self.tracing.lock().unwrap().take().is_none() {
            bail!("tracing was not started");
        }
        if self.automation.behavior.fail_stop_tracing {
            bail!("trace writer crashed");
        }
        write_file(path, b"PK\x03\x04")
    }

    async fn new_page(&self) -> Result<Arc<dyn Page>> {
        let counters = &self.automation.counters;
        let n = counters.pages_created.fetch_add(1, Ordering::SeqCst);
        counters.pages_live.fetch_add(1, Ordering::SeqCst);

        let video = self
            .video_dir
            .as_ref()
            .map(|dir| dir.join(format!("page-{}.webm", n)));
        if let (Some(path), true) = (&video, self.automation.behavior.write_video) {
            write_file(path, b"webm")?;
        }

        Ok(Arc::new(FakePage {
            automation: self.automation.clone(),
            video,
        }))
    }

    async fn close(&self) -> Result<()> {
        self.automation
            .counters
            .contexts_live
            .fetch_sub(1, Ordering::SeqCst);
        if self.automation.behavior.fail_context_close {
            bail!("context already detached");
        }
        Ok(())
    }
}

pub struct FakePage {
    automation: FakeAutomation,
    video: Option<PathBuf>,
}

impl FakePage {
    fn dom(&self) -> &FakeDom {
        &self.automation.dom
    }
}

impl Drop for FakePage {
    fn drop(&mut self) {
        self.automation
            .counters
            .pages_live
            .fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        if url.contains(".invalid") {
            bail!("net::ERR_NAME_NOT_RESOLVED at {}", url);
        }
        self.dom().actions.lock().unwrap().push(format!("goto {}", url));
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.dom().title.lock().unwrap().clone())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.dom()
            .act(selector, format!("fill {} = {}", selector, value))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.dom().act(selector, format!("click {}", selector))
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        self.dom()
            .act(selector, format!("click {} #{}", selector, index))
    }

    async fn check(&self, selector: &str) -> Result<()> {
        self.dom().act(selector, format!("check {}", selector))
    }

    async fn select_option(&self, selector: &str, label: &str) -> Result<()> {
        self.dom()
            .act(selector, format!("select {} = {}", selector, label))
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self
            .dom()
            .elements
            .lock()
            .unwrap()
            .get(selector)
            .map_or(false, |el| el.visible))
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        Ok(self
            .dom()
            .elements
            .lock()
            .unwrap()
            .get(selector)
            .and_then(|el| el.texts.first().cloned()))
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self
            .dom()
            .elements
            .lock()
            .unwrap()
            .get(selector)
            .map(|el| el.texts.clone())
            .unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.texts(selector).await?.len())
    }

    async fn screenshot(&self, path: &Path, _full_page: bool) -> Result<()> {
        if self.automation.behavior.fail_screenshot {
            bail!("page crashed");
        }
        self.automation
            .counters
            .screenshots
            .fetch_add(1, Ordering::SeqCst);
        write_file(path, b"\x89PNG")
    }

    async fn video_path(&self) -> Result<Option<PathBuf>> {
        Ok(self.video.clone())
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Sink that remembers every attachment it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub attachments: Mutex<Vec<(PathBuf, String, AttachmentKind)>>,
}

impl RecordingSink {
    pub fn attachments(&self) -> Vec<(PathBuf, String, AttachmentKind)> {
        self.attachments.lock().unwrap().clone()
    }
}

impl ReportSink for RecordingSink {
    fn attach_file(&self, path: &Path, name: &str, kind: AttachmentKind) -> Result<()> {
        self.attachments
            .lock()
            .unwrap()
            .push((path.to_path_buf(), name.to_string(), kind));
        Ok(())
    }
}

/// Configuration rooted at `reports_dir`, built-in defaults otherwise
pub fn config(reports_dir: &Path, overrides: Overrides) -> RunConfiguration {
    let overrides = Overrides {
        base_url: overrides.base_url.or_else(|| Some(BASE_URL.to_string())),
        ..overrides
    };
    let project = ProjectConfig {
        reports_dir: Some(reports_dir.to_path_buf()),
        ..Default::default()
    };
    RunConfiguration::resolve(&overrides, &project).expect("valid test configuration")
}
