//! Black-box contract verification for the product catalog service.
//!
//! Two runners observe a running service from the outside:
//! - [`contract`]: direct HTTP requests asserting status codes, payload shape
//!   and side effects.
//! - [`ui`]: a browser driven through the page's element-id convention, with
//!   bounded polling around asynchronous updates.
//!
//! Both share the fixture table in [`fixtures`] and execute through the
//! sequential [`runner`].

pub mod config;
pub mod contract;
pub mod error;
pub mod fixtures;
pub mod runner;
pub mod ui;

pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use runner::{run_suite, RunReport, Scenario, ScenarioContext};
