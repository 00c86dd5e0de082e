//! Browser-level checks of the product page.
//!
//! Pages follow a fixed element-id convention (see [`naming`]), so steps are
//! phrased in terms of field names and button labels rather than selectors.

mod driver;
pub mod naming;
mod scenarios;
mod steps;
mod wait;

#[cfg(feature = "chrome")]
mod chrome;
#[cfg(test)]
mod fake;

#[cfg(feature = "chrome")]
pub use chrome::ChromeDriver;
pub use driver::UiDriver;
pub use scenarios::{UiScenario, UiWorld};
pub use steps::UiSteps;
pub use wait::poll_until;
