//! Reusable UI steps.
//!
//! Immediate steps look an element up once and fail with `NoSuchElement`
//! when it is absent. Waiting steps poll for up to the configured timeout
//! and treat a missing element as "not yet".

use crate::config::HarnessConfig;
use crate::error::{ensure, HarnessError, HarnessResult};

use super::driver::UiDriver;
use super::naming::{button_element_id, field_element_id, FLASH_MESSAGE_ID, SEARCH_RESULTS_ID};
use super::wait::poll_until;

pub struct UiSteps<D> {
    driver: D,
    config: HarnessConfig,
}

impl<D: UiDriver> UiSteps<D> {
    pub fn new(driver: D, config: HarnessConfig) -> Self {
        Self { driver, config }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    async fn wait_for_text(&self, id: &str, text: &str) -> HarnessResult<()> {
        let driver = &self.driver;
        poll_until(
            &format!("text '{text}' in #{id}"),
            self.config.wait_timeout(),
            self.config.poll_interval(),
            move || async move { Ok::<_, HarnessError>(driver.text(id).await?.contains(text)) },
        )
        .await
    }

    pub async fn visit_home_page(&self) -> HarnessResult<()> {
        let url = self.config.url("/ui");
        tracing::debug!(%url, "visiting home page");
        self.driver.goto(&url).await
    }

    pub async fn title_should_contain(&self, text: &str) -> HarnessResult<()> {
        let title = self.driver.title().await?;
        ensure(title.contains(text), || {
            format!("page title '{title}' does not contain '{text}'")
        })
    }

    /// Snapshot check of the whole page body.
    pub async fn should_not_see_on_page(&self, text: &str) -> HarnessResult<()> {
        let body = self.driver.page_text().await?;
        ensure(!body.contains(text), || format!("page shows '{text}'"))
    }

    pub async fn set_field(&self, field: &str, value: &str) -> HarnessResult<()> {
        let id = field_element_id(field);
        self.driver.clear(&id).await?;
        self.driver.send_keys(&id, value).await
    }

    /// Like [`set_field`](Self::set_field), but waits for the input to exist first.
    pub async fn change_field(&self, field: &str, value: &str) -> HarnessResult<()> {
        let id = field_element_id(field);
        let driver = &self.driver;
        let target = id.as_str();
        poll_until(
            &format!("#{id} to be present"),
            self.config.wait_timeout(),
            self.config.poll_interval(),
            move || async move { driver.value(target).await.map(|_| true) },
        )
        .await?;

        self.driver.clear(&id).await?;
        self.driver.send_keys(&id, value).await
    }

    pub async fn press_button(&self, label: &str) -> HarnessResult<()> {
        self.driver.click(&button_element_id(label)).await
    }

    pub async fn should_see_in_results(&self, text: &str) -> HarnessResult<()> {
        self.wait_for_text(SEARCH_RESULTS_ID, text).await
    }

    /// Snapshot check without waiting. Run it after a positive wait on the
    /// same results, otherwise it can pass before the page has updated.
    pub async fn should_not_see_in_results(&self, text: &str) -> HarnessResult<()> {
        let results = self.driver.text(SEARCH_RESULTS_ID).await?;
        ensure(!results.contains(text), || {
            format!("#{SEARCH_RESULTS_ID} shows '{text}'")
        })
    }

    /// Wait until the input's value is exactly `expected`.
    pub async fn should_see_in_field(&self, field: &str, expected: &str) -> HarnessResult<()> {
        let id = field_element_id(field);
        let driver = &self.driver;
        let target = id.as_str();
        poll_until(
            &format!("#{id} to equal '{expected}'"),
            self.config.wait_timeout(),
            self.config.poll_interval(),
            move || async move { Ok::<_, HarnessError>(driver.value(target).await? == expected) },
        )
        .await
    }

    pub async fn field_value(&self, field: &str) -> HarnessResult<String> {
        self.driver.value(&field_element_id(field)).await
    }

    pub async fn should_see_message(&self, text: &str) -> HarnessResult<()> {
        self.wait_for_text(FLASH_MESSAGE_ID, text).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::ui::fake::FakeDriver;

    fn config() -> HarnessConfig {
        HarnessConfig::new("http://catalog.test").unwrap()
    }

    fn product_page() -> FakeDriver {
        FakeDriver::new("Product Demo RESTful Service")
            .with_input("product_name", "")
            .with_input("product_category", "")
            .with_element("search-btn", "Search")
            .with_element("clear-btn", "Clear")
            .with_element(SEARCH_RESULTS_ID, "")
            .with_element(FLASH_MESSAGE_ID, "")
    }

    #[tokio::test(start_paused = true)]
    async fn visit_and_title() {
        let steps = UiSteps::new(product_page(), config());
        steps.visit_home_page().await.unwrap();
        steps.title_should_contain("Product Demo").await.unwrap();

        assert_eq!(steps.driver().visited().as_deref(), Some("http://catalog.test/ui"));
        let err = steps.title_should_contain("Inventory").await.unwrap_err();
        assert_eq!(err.kind(), "assertion");
    }

    #[tokio::test(start_paused = true)]
    async fn set_field_replaces_existing_value() {
        let page = product_page().with_input("product_color", "red");
        let steps = UiSteps::new(page, config());

        steps.set_field("Color", "blue").await.unwrap();
        assert_eq!(steps.driver().current_value("product_color").as_deref(), Some("blue"));
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_steps_fail_fast_on_missing_elements() {
        let steps = UiSteps::new(product_page(), config());
        let started = Instant::now();

        let err = steps.set_field("Weight", "2kg").await.unwrap_err();
        assert!(matches!(err, HarnessError::NoSuchElement { ref id } if id == "product_weight"));

        let err = steps.press_button("Delete").await.unwrap_err();
        assert!(matches!(err, HarnessError::NoSuchElement { ref id } if id == "delete-btn"));

        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_awaited_after_a_click() {
        let page = product_page().on_click_text(
            "search-btn",
            SEARCH_RESULTS_ID,
            "ID Name Category 3 Sierra Bag",
            Duration::from_secs(2),
        );
        let steps = UiSteps::new(page, config());

        steps.press_button("Search").await.unwrap();
        steps.should_see_in_results("Sierra").await.unwrap();
        steps.should_not_see_in_results("GE4509").await.unwrap();

        assert_eq!(steps.driver().clicks(), vec!["search-btn"]);
    }

    #[tokio::test(start_paused = true)]
    async fn absence_is_a_snapshot() {
        let page = product_page().on_click_text(
            "search-btn",
            SEARCH_RESULTS_ID,
            "GE4509",
            Duration::from_secs(1),
        );
        let steps = UiSteps::new(page, config());

        steps.press_button("Search").await.unwrap();
        // Taken before the update lands.
        steps.should_not_see_in_results("GE4509").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn missing_results_time_out_after_thirty_seconds() {
        let steps = UiSteps::new(product_page(), config());
        let started = Instant::now();

        let err = steps.should_see_in_results("Sierra").await.unwrap_err();
        assert_eq!(err.kind(), "ui_timeout");
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn field_value_must_match_exactly() {
        let page = product_page().on_click_value(
            "search-btn",
            "product_category",
            "Microwave",
            Duration::from_millis(1500),
        );
        let steps = UiSteps::new(page, config());

        steps.press_button("Search").await.unwrap();
        steps.should_see_in_field("Category", "Microwave").await.unwrap();
        assert_eq!(steps.field_value("Category").await.unwrap(), "Microwave");

        let err = steps.should_see_in_field("Category", "Micro").await.unwrap_err();
        assert_eq!(err.kind(), "ui_timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn change_field_waits_for_the_input() {
        let steps = UiSteps::new(
            product_page().appear_later("product_price", "", Duration::from_secs(3)),
            config(),
        );
        let started = Instant::now();

        steps.change_field("Price", "1000").await.unwrap();
        assert_eq!(steps.driver().current_value("product_price").as_deref(), Some("1000"));
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn flash_message_is_polled() {
        let page = product_page().on_click_text(
            "clear-btn",
            FLASH_MESSAGE_ID,
            "Form Cleared",
            Duration::from_millis(700),
        );
        let steps = UiSteps::new(page, config());

        steps.press_button("Clear").await.unwrap();
        steps.should_see_message("Form Cleared").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn page_absence_checks_body_text() {
        let steps = UiSteps::new(product_page(), config());
        steps.should_not_see_on_page("404 Not Found").await.unwrap();

        let err = steps.should_not_see_on_page("Product Demo").await.unwrap_err();
        assert_eq!(err.kind(), "assertion");
    }
}
