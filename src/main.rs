use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use storefront_e2e::driver::{self, web::PlaywrightAutomation};
use storefront_e2e::runner::{self, RunOptions};
use storefront_e2e::utils::config::{
    Overrides, ProjectConfig, RunConfiguration, DEFAULT_CONFIG_FILE,
};
use storefront_e2e::report;

#[derive(Parser)]
#[command(name = "storefront-e2e")]
#[command(version)]
#[command(about = "End-to-end UI suite for the storefront", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the storefront scenarios
    Run {
        /// Browser to launch (chromium, firefox, webkit)
        #[arg(long)]
        browser: Option<String>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Store URL every test starts from
        #[arg(long)]
        base_url: Option<String>,

        /// Video recording (on, off, retain-on-failure)
        #[arg(long)]
        video: Option<String>,

        /// Screenshot capture (on, off, only-on-failure)
        #[arg(long)]
        screenshot: Option<String>,

        /// Action tracing (on, off, retain-on-failure)
        #[arg(long)]
        tracing: Option<String>,

        /// Project configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Only run scenarios carrying every given tag (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tag: Vec<String>,

        /// Only run scenarios whose name contains this text
        #[arg(short = 'k', long)]
        filter: Option<String>,

        /// Fail a test body that runs longer than this
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Data file for the data-driven login scenarios (csv, json or xlsx)
        #[arg(long, default_value = "testdata/logindata.csv")]
        login_data: PathBuf,
    },

    /// Download the browsers the suite drives
    Install,

    /// Generate report from test results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            browser,
            headed,
            base_url,
            video,
            screenshot,
            tracing,
            config,
            tag,
            filter,
            timeout_ms,
            login_data,
        } => {
            let overrides = Overrides {
                browser,
                headed: headed.then_some(true),
                base_url,
                video,
                screenshot,
                tracing,
            };
            let project = ProjectConfig::load(&config)?;
            let run_config = RunConfiguration::resolve(&overrides, &project)?;

            println!("{} Storefront suite", "▶".green().bold());
            println!("  Browser: {}", run_config.browser.as_str().cyan());
            println!("  Base URL: {}", run_config.base_url.cyan());
            if !tag.is_empty() {
                println!("  Tags: {}", tag.join(", ").yellow());
            }
            println!(
                "  Reports: {}",
                run_config.reports_dir.display().to_string().cyan()
            );

            let options = RunOptions {
                tags: tag,
                filter,
                body_timeout: timeout_ms.map(Duration::from_millis),
                login_data,
            };
            let state = runner::run_suite(
                Arc::new(PlaywrightAutomation::new()),
                run_config,
                &project,
                &options,
            )
            .await?;

            if state.has_failures() {
                std::process::exit(1);
            }
        }

        Commands::Install => {
            println!("{} Installing Playwright browsers...", "⬇".blue());
            driver::install_browsers().await?;
            println!("{} Browsers installed", "✅".green());
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
