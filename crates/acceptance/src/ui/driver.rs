use async_trait::async_trait;

use crate::error::HarnessResult;

/// Minimal browser surface the UI steps need.
///
/// Every element is addressed by id. Methods taking an id fail with
/// [`HarnessError::NoSuchElement`](crate::error::HarnessError::NoSuchElement)
/// when the page has no such element at the moment of the call.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn goto(&self, url: &str) -> HarnessResult<()>;

    async fn title(&self) -> HarnessResult<String>;

    /// Visible text of the whole document body.
    async fn page_text(&self) -> HarnessResult<String>;

    /// Visible text of one element.
    async fn text(&self, id: &str) -> HarnessResult<String>;

    /// Current `value` of an input.
    async fn value(&self, id: &str) -> HarnessResult<String>;

    async fn clear(&self, id: &str) -> HarnessResult<()>;

    async fn send_keys(&self, id: &str, text: &str) -> HarnessResult<()>;

    async fn click(&self, id: &str) -> HarnessResult<()>;
}
