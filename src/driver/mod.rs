pub mod traits;
pub mod web;

use anyhow::Result;

pub use traits::{Automation, Browser, BrowserKind, Context, ContextOptions, Engine, Page, TraceOptions};

/// Install the browser binaries for the automation backend
pub async fn install_browsers() -> Result<()> {
    web::PlaywrightAutomation::install().await
}
