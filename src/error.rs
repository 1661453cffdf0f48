//! Typed failures the lifecycle layer and its callers branch on.
//!
//! Everything else travels as a plain `anyhow::Error`; these variants are
//! wrapped into `anyhow` as well and recovered with `downcast_ref`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    /// Browser kind outside chromium/firefox/webkit.
    #[error("unsupported browser: {0} (expected chromium, firefox or webkit)")]
    UnsupportedBrowser(String),

    /// Option value outside its enum.
    #[error("invalid value '{value}' for --{option} (expected one of: {expected})")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Base URL could not be opened during page setup.
    #[error("failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Raised by a test body to mark itself skipped.
    #[error("skipped: {0}")]
    Skipped(String),

    /// An expectation did not hold before its timeout elapsed.
    #[error("expectation timed out after {timeout_ms}ms: {description}")]
    AssertionTimeout { description: String, timeout_ms: u64 },
}

impl FixtureError {
    /// True when `err` carries a [`FixtureError::Skipped`].
    pub fn is_skip(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<FixtureError>(), Some(FixtureError::Skipped(_)))
    }
}

/// Convenience for test bodies: `return skip("reason")`.
pub fn skip<T>(reason: impl Into<String>) -> anyhow::Result<T> {
    Err(FixtureError::Skipped(reason.into()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_is_detected_through_anyhow() {
        let err = skip::<()>("not on webkit").unwrap_err();
        assert!(FixtureError::is_skip(&err));
        assert_eq!(err.to_string(), "skipped: not on webkit");

        let other = anyhow::anyhow!("boom");
        assert!(!FixtureError::is_skip(&other));
    }

    #[test]
    fn test_unsupported_browser_message() {
        let err = FixtureError::UnsupportedBrowser("netscape".into());
        assert!(err.to_string().contains("netscape"));
    }
}
