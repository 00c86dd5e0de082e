//! Headless Chrome over the DevTools protocol.

use std::fmt::Display;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use super::driver::UiDriver;
use crate::error::{HarnessError, HarnessResult};

fn browser_error(e: impl Display) -> HarnessError {
    HarnessError::Browser(e.to_string())
}

/// JavaScript string literal for `text`.
fn js_string(text: &str) -> String {
    Value::from(text).to_string()
}

#[derive(Debug, Deserialize)]
struct ElementState {
    found: bool,
    text: String,
    value: String,
}

pub struct ChromeDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeDriver {
    /// Start a headless browser with one blank tab.
    pub async fn launch() -> HarnessResult<Self> {
        let config = BrowserConfig::builder()
            .window_size(1280, 900)
            .build()
            .map_err(HarnessError::Browser)?;

        let (browser, mut events) = Browser::launch(config).await.map_err(browser_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(browser_error)?;
        tracing::info!("headless chrome started");

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    pub async fn shutdown(mut self) -> HarnessResult<()> {
        self.browser.close().await.map_err(browser_error)?;
        if let Err(e) = self.handler.await {
            tracing::warn!(error = %e, "browser event loop ended abnormally");
        }
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> HarnessResult<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(browser_error)?
            .into_value()
            .map_err(browser_error)
    }

    async fn element(&self, id: &str) -> HarnessResult<ElementState> {
        let state: ElementState = self
            .eval(format!(
                "(() => {{
                    const el = document.getElementById({id});
                    if (!el) return {{ found: false, text: '', value: '' }};
                    return {{
                        found: true,
                        text: el.innerText ?? el.textContent ?? '',
                        value: el.value == null ? '' : String(el.value),
                    }};
                }})()",
                id = js_string(id)
            ))
            .await?;

        if state.found {
            Ok(state)
        } else {
            Err(HarnessError::no_such_element(id))
        }
    }
}

#[async_trait]
impl UiDriver for ChromeDriver {
    async fn goto(&self, url: &str) -> HarnessResult<()> {
        self.page.goto(url).await.map_err(browser_error)?;
        Ok(())
    }

    async fn title(&self) -> HarnessResult<String> {
        Ok(self
            .page
            .get_title()
            .await
            .map_err(browser_error)?
            .unwrap_or_default())
    }

    async fn page_text(&self) -> HarnessResult<String> {
        self.eval("document.body ? document.body.innerText : ''".to_string())
            .await
    }

    async fn text(&self, id: &str) -> HarnessResult<String> {
        Ok(self.element(id).await?.text)
    }

    async fn value(&self, id: &str) -> HarnessResult<String> {
        Ok(self.element(id).await?.value)
    }

    async fn clear(&self, id: &str) -> HarnessResult<()> {
        self.element(id).await?;
        let _: bool = self
            .eval(format!(
                "(() => {{
                    const el = document.getElementById({id});
                    el.value = '';
                    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    return true;
                }})()",
                id = js_string(id)
            ))
            .await?;
        Ok(())
    }

    async fn send_keys(&self, id: &str, text: &str) -> HarnessResult<()> {
        self.element(id).await?;
        self.page
            .find_element(format!("#{id}"))
            .await
            .map_err(browser_error)?
            .click()
            .await
            .map_err(browser_error)?
            .type_str(text)
            .await
            .map_err(browser_error)?;
        Ok(())
    }

    async fn click(&self, id: &str) -> HarnessResult<()> {
        self.element(id).await?;
        self.page
            .find_element(format!("#{id}"))
            .await
            .map_err(browser_error)?
            .click()
            .await
            .map_err(browser_error)?;
        Ok(())
    }
}
