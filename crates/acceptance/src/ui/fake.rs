//! Scripted in-memory page for exercising steps without a browser.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::driver::UiDriver;
use crate::error::{HarnessError, HarnessResult};

#[derive(Debug, Clone, Default)]
struct Element {
    text: String,
    value: String,
}

#[derive(Debug, Clone)]
enum Change {
    Text(String),
    Value(String),
}

#[derive(Debug, Clone)]
struct Reaction {
    id: String,
    change: Change,
    after: Duration,
}

#[derive(Debug, Default)]
struct State {
    url: Option<String>,
    title: String,
    elements: HashMap<String, Element>,
    reactions: HashMap<String, Vec<Reaction>>,
    pending: Vec<(Instant, String, Change)>,
    clicks: Vec<String>,
}

impl State {
    /// Apply every scheduled change whose time has come.
    fn settle(&mut self) {
        let now = Instant::now();
        let (due, later): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|(at, _, _)| *at <= now);
        self.pending = later;
        for (_, id, change) in due {
            let element = self.elements.entry(id).or_default();
            match change {
                Change::Text(text) => element.text = text,
                Change::Value(value) => element.value = value,
            }
        }
    }

    fn element(&mut self, id: &str) -> HarnessResult<&mut Element> {
        self.settle();
        self.elements
            .get_mut(id)
            .ok_or_else(|| HarnessError::no_such_element(id))
    }
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new(title: &str) -> Self {
        let driver = Self::default();
        driver.lock().title = title.to_string();
        driver
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_element(self, id: &str, text: &str) -> Self {
        self.lock().elements.insert(
            id.to_string(),
            Element {
                text: text.to_string(),
                value: String::new(),
            },
        );
        self
    }

    pub fn with_input(self, id: &str, value: &str) -> Self {
        self.lock().elements.insert(
            id.to_string(),
            Element {
                text: String::new(),
                value: value.to_string(),
            },
        );
        self
    }

    /// After `button` is clicked, set the text of `id` once `after` has passed.
    pub fn on_click_text(self, button: &str, id: &str, text: &str, after: Duration) -> Self {
        self.react(button, id, Change::Text(text.to_string()), after)
    }

    /// After `button` is clicked, set the value of `id` once `after` has passed.
    pub fn on_click_value(self, button: &str, id: &str, value: &str, after: Duration) -> Self {
        self.react(button, id, Change::Value(value.to_string()), after)
    }

    /// Create `id` with `text` once `after` has passed, without any click.
    pub fn appear_later(self, id: &str, text: &str, after: Duration) -> Self {
        let at = Instant::now() + after;
        self.lock()
            .pending
            .push((at, id.to_string(), Change::Text(text.to_string())));
        self
    }

    fn react(self, button: &str, id: &str, change: Change, after: Duration) -> Self {
        self.lock()
            .reactions
            .entry(button.to_string())
            .or_default()
            .push(Reaction {
                id: id.to_string(),
                change,
                after,
            });
        self
    }

    pub fn visited(&self) -> Option<String> {
        self.lock().url.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    pub fn current_value(&self, id: &str) -> Option<String> {
        self.lock().elements.get(id).map(|e| e.value.clone())
    }
}

#[async_trait]
impl UiDriver for FakeDriver {
    async fn goto(&self, url: &str) -> HarnessResult<()> {
        self.lock().url = Some(url.to_string());
        Ok(())
    }

    async fn title(&self) -> HarnessResult<String> {
        Ok(self.lock().title.clone())
    }

    async fn page_text(&self) -> HarnessResult<String> {
        let mut state = self.lock();
        state.settle();
        let mut text = state.title.clone();
        for element in state.elements.values() {
            text.push('\n');
            text.push_str(&element.text);
        }
        Ok(text)
    }

    async fn text(&self, id: &str) -> HarnessResult<String> {
        Ok(self.lock().element(id)?.text.clone())
    }

    async fn value(&self, id: &str) -> HarnessResult<String> {
        Ok(self.lock().element(id)?.value.clone())
    }

    async fn clear(&self, id: &str) -> HarnessResult<()> {
        self.lock().element(id)?.value.clear();
        Ok(())
    }

    async fn send_keys(&self, id: &str, text: &str) -> HarnessResult<()> {
        self.lock().element(id)?.value.push_str(text);
        Ok(())
    }

    async fn click(&self, id: &str) -> HarnessResult<()> {
        let mut state = self.lock();
        state.element(id)?;
        state.clicks.push(id.to_string());

        let now = Instant::now();
        let scheduled: Vec<_> = state
            .reactions
            .get(id)
            .into_iter()
            .flatten()
            .map(|r| (now + r.after, r.id.clone(), r.change.clone()))
            .collect();
        state.pending.extend(scheduled);
        Ok(())
    }
}
