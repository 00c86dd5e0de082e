//! Sequential scenario execution.
//!
//! Scenarios run one at a time in declaration order. Each one starts from a
//! freshly reset and seeded service; its first failure ends it, and the next
//! scenario still runs.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{HarnessError, HarnessResult};

/// State shared by the scenarios of one suite.
#[async_trait]
pub trait ScenarioContext: Send + Sync {
    /// Bring the service back to the standard fixtures.
    async fn reset_fixtures(&self) -> HarnessResult<()>;
}

/// A named, self-contained check against the service.
#[async_trait]
pub trait Scenario<C: ScenarioContext + ?Sized>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &C) -> HarnessResult<()>;
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: &'static str,
    pub elapsed: Duration,
    pub error: Option<HarnessError>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub suite: &'static str,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &HarnessError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| (o.name, e)))
    }

    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} passed, {} failed",
            self.suite,
            self.passed(),
            self.failed()
        )?;
        for outcome in &self.outcomes {
            match &outcome.error {
                None => writeln!(f, "  ok     {} ({} ms)", outcome.name, outcome.elapsed.as_millis())?,
                Some(e) => writeln!(f, "  FAILED {} [{}] {}", outcome.name, e.kind(), e)?,
            }
        }
        Ok(())
    }
}

/// Run every scenario in order against `ctx`.
pub async fn run_suite<C, S>(suite: &'static str, ctx: &C, scenarios: &[S]) -> RunReport
where
    C: ScenarioContext,
    S: Scenario<C>,
{
    let mut outcomes = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        let name = scenario.name();
        let started = Instant::now();

        let result = match ctx.reset_fixtures().await {
            Ok(()) => scenario.run(ctx).await,
            Err(e) => Err(e),
        };
        let elapsed = started.elapsed();

        match &result {
            Ok(()) => tracing::info!(suite, scenario = name, elapsed_ms = elapsed.as_millis() as u64, "scenario passed"),
            Err(e) => tracing::warn!(suite, scenario = name, kind = e.kind(), error = %e, "scenario failed"),
        }

        outcomes.push(ScenarioOutcome {
            name,
            elapsed,
            error: result.err(),
        });
    }

    let report = RunReport { suite, outcomes };
    tracing::info!(
        suite,
        passed = report.passed(),
        failed = report.failed(),
        "suite finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
        fail_reset: bool,
    }

    impl Recorder {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScenarioContext for Recorder {
        async fn reset_fixtures(&self) -> HarnessResult<()> {
            self.log.lock().unwrap().push("reset".to_string());
            if self.fail_reset {
                return Err(HarnessError::assertion("reset refused"));
            }
            Ok(())
        }
    }

    enum Step {
        Pass,
        Fail,
    }

    #[async_trait]
    impl Scenario<Recorder> for Step {
        fn name(&self) -> &'static str {
            match self {
                Step::Pass => "pass",
                Step::Fail => "fail",
            }
        }

        async fn run(&self, ctx: &Recorder) -> HarnessResult<()> {
            ctx.log.lock().unwrap().push(self.name().to_string());
            match self {
                Step::Pass => Ok(()),
                Step::Fail => Err(HarnessError::assertion("first failure")),
            }
        }
    }

    #[tokio::test]
    async fn every_scenario_starts_with_a_reset() {
        let ctx = Recorder::default();
        let report = run_suite("demo", &ctx, &[Step::Pass, Step::Pass]).await;

        assert!(report.is_success());
        assert_eq!(ctx.entries(), vec!["reset", "pass", "reset", "pass"]);
    }

    #[tokio::test]
    async fn failure_stops_only_its_own_scenario() {
        let ctx = Recorder::default();
        let report = run_suite("demo", &ctx, &[Step::Fail, Step::Pass]).await;

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(ctx.entries(), vec!["reset", "fail", "reset", "pass"]);

        let (name, err) = report.failures().next().unwrap();
        assert_eq!(name, "fail");
        assert_eq!(err.kind(), "assertion");
    }

    #[tokio::test]
    async fn failed_reset_fails_the_scenario_without_running_it() {
        let ctx = Recorder {
            fail_reset: true,
            ..Recorder::default()
        };
        let report = run_suite("demo", &ctx, &[Step::Pass]).await;

        assert_eq!(report.failed(), 1);
        assert_eq!(ctx.entries(), vec!["reset"]);
    }

    #[tokio::test]
    async fn report_renders_one_line_per_scenario() {
        let ctx = Recorder::default();
        let report = run_suite("demo", &ctx, &[Step::Pass, Step::Fail]).await;
        let text = report.to_string();

        assert!(text.starts_with("demo: 1 passed, 1 failed"));
        assert!(text.contains("ok     pass"));
        assert!(text.contains("FAILED fail [assertion] assertion failed: first failure"));
    }
}
