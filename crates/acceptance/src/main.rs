use anyhow::Context;

use catalog_acceptance::contract::{ContractClient, ContractScenario};
use catalog_acceptance::{run_suite, HarnessConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = HarnessConfig::global().context("invalid harness configuration")?;
    let client = ContractClient::new(config.clone()).context("failed to build http client")?;

    client
        .wait_until_reachable(config.wait_timeout())
        .await
        .context("service under test is not reachable")?;

    #[cfg_attr(not(feature = "chrome"), allow(unused_mut))]
    let mut reports = vec![run_suite("contract", &client, &ContractScenario::ALL).await];

    #[cfg(feature = "chrome")]
    reports.push(ui_suite(config, client).await?);

    let mut failed = 0;
    for report in &reports {
        print!("{report}");
        failed += report.failed();
    }

    anyhow::ensure!(failed == 0, "{failed} scenario(s) failed");
    Ok(())
}

#[cfg(feature = "chrome")]
async fn ui_suite(
    config: &HarnessConfig,
    client: ContractClient,
) -> anyhow::Result<catalog_acceptance::RunReport> {
    use catalog_acceptance::ui::{ChromeDriver, UiScenario, UiSteps, UiWorld};

    let driver = ChromeDriver::launch().await.context("failed to start chrome")?;
    let world = UiWorld::new(UiSteps::new(driver, config.clone()), client);

    let report = run_suite("ui", &world, &UiScenario::ALL).await;

    world.steps.into_driver().shutdown().await?;
    Ok(report)
}
