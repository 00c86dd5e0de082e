//! Browser scenarios against the product page.

use async_trait::async_trait;

use super::driver::UiDriver;
use super::steps::UiSteps;
use crate::contract::ContractClient;
use crate::error::{ensure, HarnessResult};
use crate::runner::{Scenario, ScenarioContext};

const PAGE_TITLE: &str = "Product Demo RESTful Service";

/// Browser steps plus an HTTP client for fixture resets and id lookups.
pub struct UiWorld<D> {
    pub steps: UiSteps<D>,
    pub api: ContractClient,
}

impl<D: UiDriver> UiWorld<D> {
    pub fn new(steps: UiSteps<D>, api: ContractClient) -> Self {
        Self { steps, api }
    }
}

#[async_trait]
impl<D: UiDriver> ScenarioContext for UiWorld<D> {
    async fn reset_fixtures(&self) -> HarnessResult<()> {
        self.api.reset_fixtures().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiScenario {
    HomePage,
    SearchByName,
    SearchByCategory,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

impl UiScenario {
    pub const ALL: [UiScenario; 6] = [
        UiScenario::HomePage,
        UiScenario::SearchByName,
        UiScenario::SearchByCategory,
        UiScenario::CreateProduct,
        UiScenario::UpdateProduct,
        UiScenario::DeleteProduct,
    ];
}

#[async_trait]
impl<D: UiDriver> Scenario<UiWorld<D>> for UiScenario {
    fn name(&self) -> &'static str {
        match self {
            UiScenario::HomePage => "ui: home page is served",
            UiScenario::SearchByName => "ui: search by name",
            UiScenario::SearchByCategory => "ui: search by category",
            UiScenario::CreateProduct => "ui: create a product",
            UiScenario::UpdateProduct => "ui: update a product",
            UiScenario::DeleteProduct => "ui: delete a product",
        }
    }

    async fn run(&self, world: &UiWorld<D>) -> HarnessResult<()> {
        let ui = &world.steps;
        ui.visit_home_page().await?;

        match self {
            UiScenario::HomePage => {
                ui.title_should_contain(PAGE_TITLE).await?;
                ui.should_not_see_on_page("404 Not Found").await
            }
            UiScenario::SearchByName => {
                ui.set_field("Name", "Sierra").await?;
                ui.press_button("Search").await?;
                ui.should_see_message("Success").await?;
                ui.should_see_in_results("Sierra").await?;
                ui.should_not_see_in_results("GE4509").await?;
                ui.should_see_in_field("Category", "Bag").await
            }
            UiScenario::SearchByCategory => {
                ui.press_button("Clear").await?;
                ui.set_field("Category", "Microwave").await?;
                ui.press_button("Search").await?;
                ui.should_see_message("Success").await?;
                ui.should_see_in_results("GE4509").await?;
                ui.should_not_see_in_results("Asus2500").await?;
                ui.should_not_see_in_results("Sierra").await
            }
            UiScenario::CreateProduct => {
                ui.set_field("Name", "Hammer").await?;
                ui.set_field("Category", "Tools").await?;
                ui.set_field("Color", "black").await?;
                ui.set_field("Count", "7").await?;
                ui.set_field("Price", "25").await?;
                ui.set_field("Description", "Claw hammer").await?;
                ui.press_button("Create").await?;
                ui.should_see_message("Success").await?;

                let id = ui.field_value("Id").await?;
                ensure(!id.is_empty(), || "created product id was not shown".to_string())?;

                ui.press_button("Clear").await?;
                ui.should_see_message("Form Cleared").await?;
                ui.set_field("Id", &id).await?;
                ui.press_button("Retrieve").await?;
                ui.should_see_in_field("Name", "Hammer").await?;
                ui.should_see_in_field("Description", "Claw hammer").await
            }
            UiScenario::UpdateProduct => {
                ui.set_field("Name", "GE4509").await?;
                ui.press_button("Search").await?;
                ui.should_see_message("Success").await?;
                ui.should_see_in_field("Category", "Microwave").await?;
                ui.change_field("Category", "Oven").await?;

                // The page blanks the flash on click, so this "Success"
                // can only come from the update response.
                ui.press_button("Update").await?;
                ui.should_see_message("Success").await?;

                ui.press_button("Clear").await?;
                ui.should_see_message("Form Cleared").await?;
                ui.set_field("Category", "Oven").await?;
                ui.press_button("Search").await?;
                ui.should_see_in_results("GE4509").await?;
                ui.should_not_see_in_results("Microwave").await
            }
            UiScenario::DeleteProduct => {
                let target = world.api.find_listed("Sierra").await?;
                ui.set_field("Id", &target.id.to_string()).await?;
                ui.press_button("Delete").await?;
                ui.should_see_message("Product has been Deleted!").await?;

                ui.press_button("Clear").await?;
                ui.press_button("Search").await?;
                ui.should_see_in_results("GE4509").await?;
                ui.should_not_see_in_results("Sierra").await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use super::*;
    use crate::config::HarnessConfig;
    use crate::runner::run_suite;
    use crate::ui::fake::FakeDriver;
    use crate::ui::naming::{FLASH_MESSAGE_ID, SEARCH_RESULTS_ID};

    const SOON: Duration = Duration::from_millis(20);

    /// A fake page wired to a real catalog service on an ephemeral port.
    async fn world(
        page: FakeDriver,
        wait: Duration,
    ) -> (UiWorld<FakeDriver>, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let app = catalog_api::app::build_app(catalog_api::app::services::AppServices::in_memory());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = HarnessConfig::new(base_url)
            .unwrap()
            .with_wait(wait, Duration::from_millis(10));
        let api = ContractClient::new(config.clone()).unwrap();
        (UiWorld::new(UiSteps::new(page, config), api), handle)
    }

    fn product_page() -> FakeDriver {
        let mut page = FakeDriver::new(PAGE_TITLE)
            .with_element(SEARCH_RESULTS_ID, "")
            .with_element(FLASH_MESSAGE_ID, "");
        for field in ["id", "name", "category", "color", "count", "price", "description"] {
            page = page.with_input(&format!("product_{field}"), "");
        }
        for button in ["create", "retrieve", "update", "delete", "clear", "search"] {
            let id = format!("{button}-btn");
            page = page
                .with_element(&id, button)
                .on_click_text(&id, FLASH_MESSAGE_ID, "", Duration::ZERO);
        }
        page
    }

    #[test]
    fn scenario_names_are_unique() {
        let names: HashSet<&str> = UiScenario::ALL
            .iter()
            .map(|s| <UiScenario as Scenario<UiWorld<FakeDriver>>>::name(s))
            .collect();
        assert_eq!(names.len(), UiScenario::ALL.len());
    }

    #[tokio::test]
    async fn search_by_name_finds_the_seeded_product() {
        let page = product_page()
            .on_click_text("search-btn", FLASH_MESSAGE_ID, "Success", SOON)
            .on_click_text("search-btn", SEARCH_RESULTS_ID, "ID Name Category 3 Sierra Bag", SOON)
            .on_click_value("search-btn", "product_category", "Bag", SOON);
        let (world, server) = world(page, Duration::from_secs(2)).await;

        let report = run_suite("ui", &world, &[UiScenario::SearchByName]).await;

        assert!(report.is_success(), "{report}");
        assert_eq!(world.api.product_count().await.unwrap(), 3);
        assert_eq!(
            world.steps.driver().visited(),
            Some(world.api.config().url("/ui"))
        );
        assert_eq!(world.steps.driver().current_value("product_name").as_deref(), Some("Sierra"));
        assert_eq!(world.steps.driver().clicks(), vec!["search-btn"]);
        server.abort();
    }

    #[tokio::test]
    async fn search_by_name_fails_when_other_products_are_listed() {
        let page = product_page()
            .on_click_text("search-btn", FLASH_MESSAGE_ID, "Success", SOON)
            .on_click_text("search-btn", SEARCH_RESULTS_ID, "3 Sierra Bag 2 GE4509 Microwave", SOON);
        let (world, server) = world(page, Duration::from_secs(2)).await;

        let report = run_suite("ui", &world, &[UiScenario::SearchByName]).await;

        assert_eq!(report.failed(), 1);
        let (name, err) = report.failures().next().unwrap();
        assert_eq!(name, "ui: search by name");
        assert_eq!(err.kind(), "assertion");
        assert!(err.to_string().contains("GE4509"));
        server.abort();
    }

    #[tokio::test]
    async fn update_waits_for_its_own_confirmation() {
        // Search confirms, but the update never does.
        let page = product_page()
            .on_click_text("search-btn", FLASH_MESSAGE_ID, "Success", SOON)
            .on_click_value("search-btn", "product_category", "Microwave", SOON);
        let (world, server) = world(page, Duration::from_millis(300)).await;

        let report = run_suite("ui", &world, &[UiScenario::UpdateProduct]).await;

        assert_eq!(report.failed(), 1);
        let (_, err) = report.failures().next().unwrap();
        assert_eq!(err.kind(), "ui_timeout");
        assert!(err.to_string().contains("Success"));
        assert_eq!(world.steps.driver().clicks(), vec!["search-btn", "update-btn"]);
        assert_eq!(
            world.steps.driver().current_value("product_category").as_deref(),
            Some("Oven")
        );
        server.abort();
    }

    #[tokio::test]
    async fn update_passes_once_the_page_confirms() {
        let page = product_page()
            .on_click_text("search-btn", FLASH_MESSAGE_ID, "Success", SOON)
            .on_click_value("search-btn", "product_category", "Microwave", SOON)
            .on_click_text("search-btn", SEARCH_RESULTS_ID, "2 GE4509 Oven", SOON)
            .on_click_text("update-btn", FLASH_MESSAGE_ID, "Success", SOON)
            .on_click_text("clear-btn", FLASH_MESSAGE_ID, "Form Cleared", Duration::ZERO);
        let (world, server) = world(page, Duration::from_secs(2)).await;

        let report = run_suite("ui", &world, &[UiScenario::UpdateProduct]).await;

        assert!(report.is_success(), "{report}");
        assert_eq!(
            world.steps.driver().clicks(),
            vec!["search-btn", "update-btn", "clear-btn", "search-btn"]
        );
        server.abort();
    }

    #[tokio::test]
    async fn delete_targets_the_id_assigned_by_the_service() {
        let page = product_page()
            .on_click_text("delete-btn", FLASH_MESSAGE_ID, "Product has been Deleted!", SOON)
            .on_click_text("clear-btn", FLASH_MESSAGE_ID, "Form Cleared", Duration::ZERO)
            .on_click_text("search-btn", SEARCH_RESULTS_ID, "1 Asus2500 2 GE4509", SOON);
        let (world, server) = world(page, Duration::from_secs(2)).await;

        let report = run_suite("ui", &world, &[UiScenario::DeleteProduct]).await;

        assert!(report.is_success(), "{report}");
        // Sierra is the third fixture, and every scenario starts from a reset.
        assert_eq!(world.steps.driver().current_value("product_id").as_deref(), Some("3"));
        server.abort();
    }
}
