//! Per-phase outcome tracking
//!
//! [`OutcomeTracker::observe`] wraps the execution of one lifecycle phase,
//! records how it ended and hands the result back untouched. Panics are
//! caught only long enough to be recorded; [`Completion::into_result`]
//! resumes them.

use anyhow::Result;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use super::state::{Phase, TestOutcome, TestStatus};
use crate::error::FixtureError;

/// How a phase ended
pub enum Completion<T> {
    Returned(Result<T>),
    Panicked(Box<dyn Any + Send + 'static>),
}

impl<T> Completion<T> {
    pub fn status(&self) -> TestStatus {
        match self {
            Completion::Returned(Ok(_)) => TestStatus::Passed,
            Completion::Returned(Err(e)) if FixtureError::is_skip(e) => TestStatus::Skipped,
            Completion::Returned(Err(_)) | Completion::Panicked(_) => TestStatus::Failed,
        }
    }

    /// Failure or skip message, `None` on success
    pub fn error_message(&self) -> Option<String> {
        match self {
            Completion::Returned(Ok(_)) => None,
            Completion::Returned(Err(e)) => Some(format!("{:#}", e)),
            Completion::Panicked(payload) => Some(panic_message(payload.as_ref())),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Completion::Returned(Ok(_)))
    }

    /// Keep the failure, drop the success value
    pub fn discard(self) -> Completion<()> {
        match self {
            Completion::Returned(r) => Completion::Returned(r.map(|_| ())),
            Completion::Panicked(p) => Completion::Panicked(p),
        }
    }

    /// The original result; a caught panic is resumed
    pub fn into_result(self) -> Result<T> {
        match self {
            Completion::Returned(r) => r,
            Completion::Panicked(payload) => std::panic::resume_unwind(payload),
        }
    }
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

/// Outcome records for a single test, one per phase
#[derive(Debug, Default, Clone)]
pub struct OutcomeTracker {
    outcomes: Vec<TestOutcome>,
}

impl OutcomeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` as `phase` and record its status
    pub async fn observe<T, F>(&mut self, phase: Phase, fut: F) -> Completion<T>
    where
        F: Future<Output = Result<T>>,
    {
        let completion = match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => Completion::Returned(result),
            Err(payload) => Completion::Panicked(payload),
        };
        self.record(phase, completion.status());
        completion
    }

    /// Record a phase status. Each phase is written once; later writes are ignored.
    pub fn record(&mut self, phase: Phase, status: TestStatus) {
        if self.outcome(phase).is_some() {
            log::warn!("Outcome for phase '{}' already recorded", phase.as_str());
            return;
        }
        self.outcomes.push(TestOutcome { phase, status });
    }

    pub fn outcome(&self, phase: Phase) -> Option<TestOutcome> {
        self.outcomes.iter().copied().find(|o| o.phase == phase)
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }
}
