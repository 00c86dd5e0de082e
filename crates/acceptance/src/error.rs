//! Failure taxonomy for scenarios.
//!
//! Every variant is terminal for the scenario that raised it; nothing is
//! retried.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The service answered with a status other than the one the contract requires.
    #[error("contract violation on {operation}: expected {expected}, got {actual} (body: {body})")]
    ContractViolation {
        operation: String,
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },

    /// The body did not decode as expected, or a decoded field is absent or wrong.
    #[error("shape violation on {operation}: {detail}")]
    ShapeViolation { operation: String, detail: String },

    /// A polled UI condition did not become true in time.
    #[error("timed out after {}s waiting for {condition}", .waited.as_secs_f32())]
    UiTimeout { condition: String, waited: Duration },

    /// An element id does not exist on the page at all.
    #[error("no such element: #{id}")]
    NoSuchElement { id: String },

    /// Any other failed expectation.
    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("browser error: {0}")]
    Browser(String),
}

impl HarnessError {
    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::Assertion(msg.into())
    }

    pub fn shape(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ShapeViolation {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    pub fn no_such_element(id: impl Into<String>) -> Self {
        Self::NoSuchElement { id: id.into() }
    }

    /// Short stable label used in reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::ContractViolation { .. } => "contract_violation",
            HarnessError::ShapeViolation { .. } => "shape_violation",
            HarnessError::UiTimeout { .. } => "ui_timeout",
            HarnessError::NoSuchElement { .. } => "no_such_element",
            HarnessError::Assertion(_) => "assertion",
            HarnessError::Config(_) => "config",
            HarnessError::Transport(_) => "transport",
            HarnessError::Browser(_) => "browser",
        }
    }
}

/// Fail with an [`HarnessError::Assertion`] unless `cond` holds.
pub fn ensure(cond: bool, msg: impl FnOnce() -> String) -> HarnessResult<()> {
    if cond {
        Ok(())
    } else {
        Err(HarnessError::Assertion(msg()))
    }
}
