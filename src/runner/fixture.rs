//! Per-test browser lifecycle
//!
//! A test runs as three observed phases:
//! - setup: engine, browser and context ([`BrowserScope`]), then tracing,
//!   page and navigation ([`PageScope`])
//! - call: the test body
//! - teardown: artifact capture, then release in the order
//!   context, browser, engine
//!
//! Release happens on every exit path. A body that panics is recorded as a
//! failure, the scope is released, and the panic resumes from
//! [`TestRun::into_result`].

use anyhow::{anyhow, Context as _, Result};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::artifacts::{self, ArtifactLayout, ArtifactRecord};
use super::outcome::{panic_message, Completion, OutcomeTracker};
use super::state::{Phase, TestOutcome, TestReport, TestStatus};
use crate::driver::traits::{
    Automation, Browser, Context, ContextOptions, Engine, Page, TraceOptions,
};
use crate::error::FixtureError;
use crate::report::ReportSink;
use crate::utils::config::RunConfiguration;

/// Engine, browser and context owned by one test
pub struct BrowserScope {
    engine: Box<dyn Engine>,
    browser: Box<dyn Browser>,
    context: Box<dyn Context>,
}

impl BrowserScope {
    /// Start an engine, launch the configured browser and open a context.
    ///
    /// On failure, whatever was already acquired is released before the
    /// error is returned.
    pub async fn acquire(
        automation: &dyn Automation,
        config: &RunConfiguration,
        layout: &ArtifactLayout,
    ) -> Result<Self> {
        let options = if config.video.records() {
            let dir = layout.videos_dir();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            ContextOptions {
                record_video_dir: Some(dir),
            }
        } else {
            ContextOptions::default()
        };

        let engine = automation
            .start()
            .await
            .context("Failed to start automation engine")?;

        log::info!(
            "Starting browser: {} (headless={})",
            config.browser.as_str(),
            config.headless()
        );
        let browser = match engine.launch(config.browser, config.headless()).await {
            Ok(browser) => browser,
            Err(e) => {
                stop_engine(engine).await;
                return Err(e.context(format!("Failed to launch {}", config.browser.as_str())));
            }
        };

        let context = match browser.new_context(&options).await {
            Ok(context) => context,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    log::warn!("Failed to close browser: {:#}", close_err);
                }
                stop_engine(engine).await;
                return Err(e.context("Failed to create browser context"));
            }
        };

        Ok(Self {
            engine,
            browser,
            context,
        })
    }

    pub fn context(&self) -> &dyn Context {
        self.context.as_ref()
    }

    /// Close context, browser and engine, in that order. Every step is
    /// attempted; the first error is returned.
    pub async fn release(self) -> Result<()> {
        log::info!("Closing browser context");
        let mut first_error = None;

        if let Err(e) = self.context.close().await {
            log::warn!("Failed to close context: {:#}", e);
            first_error.get_or_insert(e.context("Failed to close context"));
        }
        if let Err(e) = self.browser.close().await {
            log::warn!("Failed to close browser: {:#}", e);
            first_error.get_or_insert(e.context("Failed to close browser"));
        }
        if let Err(e) = self.engine.stop().await {
            log::warn!("Failed to stop engine: {:#}", e);
            first_error.get_or_insert(e.context("Failed to stop automation engine"));
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

async fn stop_engine(engine: Box<dyn Engine>) {
    if let Err(e) = engine.stop().await {
        log::warn!("Failed to stop engine: {:#}", e);
    }
}

/// The page handed to a test body, plus its tracing state
pub struct PageScope {
    page: Arc<dyn Page>,
    tracing_started: bool,
}

impl PageScope {
    /// Start tracing if enabled, open a page and navigate to the base URL
    pub async fn acquire(context: &dyn Context, config: &RunConfiguration) -> Result<Self> {
        let tracing_started = if config.tracing.enabled() {
            context
                .start_tracing(TraceOptions::full())
                .await
                .context("Failed to start tracing")?;
            log::debug!("Tracing started");
            true
        } else {
            false
        };

        let page = context.new_page().await.context("Failed to open page")?;

        log::info!("Navigating to: {}", config.base_url);
        page.goto(&config.base_url)
            .await
            .map_err(|e| FixtureError::Navigation {
                url: config.base_url.clone(),
                reason: format!("{:#}", e),
            })?;

        Ok(Self {
            page,
            tracing_started,
        })
    }

    pub fn page(&self) -> Arc<dyn Page> {
        Arc::clone(&self.page)
    }

    pub fn tracing_started(&self) -> bool {
        self.tracing_started
    }

    /// Persist the trace and, for a failed call, screenshot and video
    pub async fn finalize(
        &self,
        context: &dyn Context,
        call_outcome: Option<TestOutcome>,
        config: &RunConfiguration,
        layout: &ArtifactLayout,
        sink: &dyn ReportSink,
        test_name: &str,
    ) -> Vec<ArtifactRecord> {
        artifacts::capture(
            context,
            self.page.as_ref(),
            self.tracing_started,
            call_outcome,
            config,
            layout,
            sink,
            test_name,
        )
        .await
    }
}

/// Runs test bodies inside a fresh browser scope each
pub struct Fixture {
    automation: Arc<dyn Automation>,
    config: RunConfiguration,
    sink: Arc<dyn ReportSink>,
    layout: ArtifactLayout,
    body_timeout: Option<Duration>,
}

impl Fixture {
    pub fn new(
        automation: Arc<dyn Automation>,
        config: RunConfiguration,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        let layout = ArtifactLayout::new(config.reports_dir.clone());
        Self {
            automation,
            config,
            sink,
            layout,
            body_timeout: None,
        }
    }

    /// Fail the call phase when the body runs longer than `timeout`
    pub fn with_body_timeout(mut self, timeout: Duration) -> Self {
        self.body_timeout = Some(timeout);
        self
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Run `body` as test `name` and return everything that happened
    pub async fn execute<F, Fut>(&self, name: &str, body: F) -> TestRun
    where
        F: FnOnce(Arc<dyn Page>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let started = Instant::now();
        let mut tracker = OutcomeTracker::new();
        let mut browser_scope: Option<BrowserScope> = None;

        let setup = tracker
            .observe(Phase::Setup, async {
                let scope = BrowserScope::acquire(
                    self.automation.as_ref(),
                    &self.config,
                    &self.layout,
                )
                .await?;
                let scope = browser_scope.insert(scope);
                PageScope::acquire(scope.context(), &self.config).await
            })
            .await;

        let (outcome, page_scope) = match setup {
            Completion::Returned(Ok(page_scope)) => {
                let page = page_scope.page();
                let timeout = self.body_timeout;
                let call = tracker
                    .observe(Phase::Call, async move {
                        bounded(timeout, body(page)).await
                    })
                    .await;
                (call, Some(page_scope))
            }
            failed => (failed.discard(), None),
        };

        let call_outcome = tracker.outcome(Phase::Call);
        let mut artifacts = Vec::new();
        let teardown = tracker
            .observe(Phase::Teardown, async {
                if let (Some(scope), Some(page_scope)) = (browser_scope.as_ref(), page_scope.as_ref())
                {
                    let finalize = page_scope.finalize(
                        scope.context(),
                        call_outcome,
                        &self.config,
                        &self.layout,
                        self.sink.as_ref(),
                        name,
                    );
                    match AssertUnwindSafe(finalize).catch_unwind().await {
                        Ok(captured) => artifacts = captured,
                        Err(payload) => log::warn!(
                            "Artifact capture for '{}' {}",
                            name,
                            panic_message(payload.as_ref())
                        ),
                    }
                }
                drop(page_scope);
                match browser_scope.take() {
                    Some(scope) => scope.release().await,
                    None => Ok(()),
                }
            })
            .await;

        let teardown_error = teardown.error_message();
        if let Some(message) = &teardown_error {
            log::warn!("Teardown of '{}' failed: {}", name, message);
        }

        TestRun {
            name: name.to_string(),
            outcome,
            phases: tracker.outcomes().to_vec(),
            teardown_error,
            artifacts,
            duration: started.elapsed(),
        }
    }

    /// Run `body` and return its result unmodified
    pub async fn run<F, Fut>(&self, name: &str, body: F) -> Result<()>
    where
        F: FnOnce(Arc<dyn Page>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.execute(name, body).await.into_result()
    }
}

async fn bounded<Fut>(timeout: Option<Duration>, body: Fut) -> Result<()>
where
    Fut: Future<Output = Result<()>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, body)
            .await
            .map_err(|_| anyhow!("Test body timed out after {} ms", limit.as_millis()))?,
        None => body.await,
    }
}

/// Everything recorded about one executed test
pub struct TestRun {
    pub name: String,
    outcome: Completion<()>,
    pub phases: Vec<TestOutcome>,
    pub teardown_error: Option<String>,
    pub artifacts: Vec<ArtifactRecord>,
    pub duration: Duration,
}

impl TestRun {
    pub fn status(&self) -> TestStatus {
        self.outcome.status()
    }

    pub fn error_message(&self) -> Option<String> {
        self.outcome.error_message()
    }

    pub fn phase(&self, phase: Phase) -> Option<TestStatus> {
        self.phases
            .iter()
            .find(|o| o.phase == phase)
            .map(|o| o.status)
    }

    pub fn to_report(&self, tags: &[&str]) -> TestReport {
        TestReport {
            name: self.name.clone(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status: self.status(),
            duration_ms: self.duration.as_millis() as u64,
            error: self.error_message(),
            teardown_error: self.teardown_error.clone(),
            phases: self.phases.clone(),
            artifacts: self.artifacts.clone(),
        }
    }

    /// The primary result: setup failure if setup failed, otherwise the
    /// body's. A panic in the body resumes here.
    pub fn into_result(self) -> Result<()> {
        self.outcome.into_result()
    }
}
