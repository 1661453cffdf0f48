pub mod artifacts;
pub mod fixture;
pub mod outcome;
pub mod state;

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::driver::traits::Automation;
use crate::report::{self, AllureSink, ReportSink};
use crate::suite::{self, Scenario};
use crate::utils::config::{ProjectConfig, RunConfiguration};
use artifacts::ArtifactLayout;
use fixture::{Fixture, TestRun};
use state::{SuiteState, TestStatus};

pub use fixture::{BrowserScope, PageScope};
pub use outcome::OutcomeTracker;

/// What to run, beyond the resolved configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub tags: Vec<String>,
    pub filter: Option<String>,
    pub body_timeout: Option<Duration>,
    pub login_data: PathBuf,
}

/// Run the selected scenarios, one fresh browser scope each, and write the
/// JSON and JUnit summaries into the reports directory.
pub async fn run_suite(
    automation: Arc<dyn Automation>,
    config: RunConfiguration,
    project: &ProjectConfig,
    options: &RunOptions,
) -> Result<SuiteState> {
    let all = suite::scenarios(&project.store, &options.login_data);
    let selected = suite::select(all, &options.tags, options.filter.as_deref());

    let session_id = uuid::Uuid::new_v4().to_string();
    let mut state = SuiteState::new(&session_id);

    if selected.is_empty() {
        println!("{} No scenarios match the selection.", "ℹ".blue());
        return Ok(state);
    }

    let layout = ArtifactLayout::new(config.reports_dir.clone());
    let allure = Arc::new(AllureSink::new(layout.allure_results_dir())?);
    let sink: Arc<dyn ReportSink> = allure.clone();

    let mut fixture = Fixture::new(automation, config, sink);
    if let Some(timeout) = options.body_timeout {
        fixture = fixture.with_body_timeout(timeout);
    }

    println!(
        "{} Running {} scenario(s) [{}]",
        "▶".green().bold(),
        selected.len(),
        fixture.config()
    );

    state.start();
    for scenario in &selected {
        allure.start_test(&scenario.name, &scenario.tags)?;
        let run = fixture
            .execute(&scenario.name, |page| scenario.run(page))
            .await;
        if let Err(e) = allure.finish_test(run.status(), run.error_message()) {
            log::warn!("Failed to write Allure result for '{}': {:#}", scenario.name, e);
        }
        print_result(scenario, &run);
        state.add_test(run.to_report(&scenario.tags));
    }
    state.finish();

    let results = state.to_results();
    let json_path = report::json::write_report(&results, layout.root())?;
    let junit_path = report::junit::write_report(&results, layout.root())?;
    print_summary(&state);
    println!("  Results: {}", json_path.display().to_string().cyan());
    println!("  JUnit: {}", junit_path.display().to_string().cyan());

    Ok(state)
}

fn print_result(scenario: &Scenario, run: &TestRun) {
    let seconds = run.duration.as_secs_f64();
    match run.status() {
        TestStatus::Passed => println!(
            "{} {} ({:.1}s)",
            "PASS".green().bold(),
            scenario.name,
            seconds
        ),
        TestStatus::Failed => {
            println!("{} {} ({:.1}s)", "FAIL".red().bold(), scenario.name, seconds);
            if let Some(message) = run.error_message() {
                println!("     {}", message.red());
            }
        }
        TestStatus::Skipped => {
            println!("{} {}", "SKIP".yellow().bold(), scenario.name);
            if let Some(message) = run.error_message() {
                println!("     {}", message.dimmed());
            }
        }
    }
    if let Some(teardown) = &run.teardown_error {
        println!("     {} {}", "teardown:".yellow(), teardown);
    }
    for artifact in &run.artifacts {
        println!("     {} {}", "↳".dimmed(), artifact.path.display());
    }
}

fn print_summary(state: &SuiteState) {
    let summary = state.summary();
    let line = format!(
        "{} passed, {} failed, {} skipped",
        summary.passed, summary.failed, summary.skipped
    );
    if summary.failed > 0 {
        println!("\n{} {}", "✗".red().bold(), line);
    } else {
        println!("\n{} {}", "✓".green().bold(), line);
    }
}
