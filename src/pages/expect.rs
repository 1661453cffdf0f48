//! Retrying expectations over a [`Page`]
//!
//! Each check is polled until it holds or the timeout elapses. Driver errors
//! during polling count as "not yet"; the last one is reported on timeout.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::driver::traits::Page;
use crate::error::FixtureError;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

async fn poll_until<F, Fut>(description: String, timeout_ms: u64, mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    let mut last_error = None;

    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => last_error = Some(format!("{:#}", e)),
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    let description = match last_error {
        Some(err) => format!("{} (last error: {})", description, err),
        None => description,
    };
    Err(FixtureError::AssertionTimeout {
        description,
        timeout_ms,
    }
    .into())
}

pub async fn to_be_visible(page: &dyn Page, selector: &str, timeout_ms: u64) -> Result<()> {
    poll_until(format!("'{}' to be visible", selector), timeout_ms, move || {
        page.is_visible(selector)
    })
    .await
}

/// Whitespace runs collapse to one space; leading and trailing space is dropped
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first match's whole text equals `expected`, up to whitespace
pub async fn to_have_text(
    page: &dyn Page,
    selector: &str,
    expected: &str,
    timeout_ms: u64,
) -> Result<()> {
    let expected = normalize_whitespace(expected);
    let expected = expected.as_str();
    poll_until(
        format!("'{}' to have text '{}'", selector, expected),
        timeout_ms,
        move || async move {
            Ok(page
                .text(selector)
                .await?
                .map_or(false, |t| normalize_whitespace(&t) == expected))
        },
    )
    .await
}

pub async fn to_have_title(page: &dyn Page, expected: &str, timeout_ms: u64) -> Result<()> {
    poll_until(
        format!("page title to be '{}'", expected),
        timeout_ms,
        move || async move { Ok(page.title().await? == expected) },
    )
    .await
}
