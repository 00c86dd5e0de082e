use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderName, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::{FixtureRow, FixtureTable};
use crate::runner::ScenarioContext;

/// A product as the service returns it. Every field is required, so a
/// missing one is reported as a shape violation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub color: String,
    pub count: String,
    pub price: String,
    pub description: String,
}

impl ProductRecord {
    /// Every submitted column reproduced verbatim (numbers compared as text).
    pub fn matches_row(&self, row: &FixtureRow) -> bool {
        self.name == row.name
            && self.category == row.category
            && self.color == row.color
            && self.count == row.count
            && self.price == row.price
            && self.description == row.description
    }
}

/// One request/response pair, labelled with the operation for error reports.
#[derive(Debug)]
pub struct Exchange {
    operation: String,
    response: reqwest::Response,
}

impl Exchange {
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn header(&self, name: HeaderName) -> Option<String> {
        self.response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Fail with a contract violation unless the status is `expected`.
    pub async fn expect(self, expected: StatusCode) -> HarnessResult<Self> {
        let actual = self.response.status();
        if actual == expected {
            return Ok(self);
        }
        let body = self.response.text().await.unwrap_or_default();
        Err(HarnessError::ContractViolation {
            operation: self.operation,
            expected,
            actual,
            body,
        })
    }

    pub async fn text(self) -> HarnessResult<String> {
        Ok(self.response.text().await?)
    }

    pub async fn json<T: DeserializeOwned>(self) -> HarnessResult<T> {
        self.json_with_raw().await.map(|(_, value)| value)
    }

    /// Decode the body and also hand back the raw text for substring checks.
    pub async fn json_with_raw<T: DeserializeOwned>(self) -> HarnessResult<(String, T)> {
        let operation = self.operation;
        let raw = self.response.text().await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok((raw, value)),
            Err(e) => Err(HarnessError::shape(operation, format!("{e}; body: {raw}"))),
        }
    }
}

/// HTTP client for the product resource, plus the fixture helpers.
#[derive(Debug, Clone)]
pub struct ContractClient {
    http: reqwest::Client,
    config: HarnessConfig,
    fixtures: FixtureTable,
}

impl ContractClient {
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.wait_timeout())
            .build()?;

        Ok(Self {
            http,
            config,
            fixtures: FixtureTable::standard()?,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The table every scenario is seeded with.
    pub fn fixtures(&self) -> &FixtureTable {
        &self.fixtures
    }

    async fn send(&self, operation: String, request: RequestBuilder) -> HarnessResult<Exchange> {
        tracing::debug!(%operation, "request");
        let response = request.send().await?;
        tracing::debug!(%operation, status = response.status().as_u16(), "response");
        Ok(Exchange {
            operation,
            response,
        })
    }

    pub async fn index(&self) -> HarnessResult<Exchange> {
        self.send("GET /".to_string(), self.http.get(self.config.url("/")))
            .await
    }

    pub async fn list(&self) -> HarnessResult<Exchange> {
        self.send(
            "GET /products".to_string(),
            self.http.get(self.config.url("/products")),
        )
        .await
    }

    pub async fn query(&self, field: &str, value: &str) -> HarnessResult<Exchange> {
        self.send(
            format!("GET /products?{field}={value}"),
            self.http
                .get(self.config.url("/products"))
                .query(&[(field, value)]),
        )
        .await
    }

    pub async fn get(&self, id: u64) -> HarnessResult<Exchange> {
        let path = format!("/products/{id}");
        self.send(format!("GET {path}"), self.http.get(self.config.url(&path)))
            .await
    }

    pub async fn create(&self, body: &(impl Serialize + Sync)) -> HarnessResult<Exchange> {
        self.send(
            "POST /products".to_string(),
            self.http.post(self.config.url("/products")).json(body),
        )
        .await
    }

    pub async fn update(&self, id: u64, body: &(impl Serialize + Sync)) -> HarnessResult<Exchange> {
        let path = format!("/products/{id}");
        self.send(
            format!("PUT {path}"),
            self.http.put(self.config.url(&path)).json(body),
        )
        .await
    }

    pub async fn delete(&self, id: u64) -> HarnessResult<Exchange> {
        let path = format!("/products/{id}");
        self.send(format!("DELETE {path}"), self.http.delete(self.config.url(&path)))
            .await
    }

    /// Bulk delete; the service must answer 204.
    pub async fn reset(&self) -> HarnessResult<()> {
        self.send(
            "DELETE /products/reset".to_string(),
            self.http.delete(self.config.url("/products/reset")),
        )
        .await?
        .expect(StatusCode::NO_CONTENT)
        .await?;
        Ok(())
    }

    /// Create one product per row; every create must answer 201.
    pub async fn seed(&self, table: &FixtureTable) -> HarnessResult<Vec<ProductRecord>> {
        let mut created = Vec::with_capacity(table.len());
        for row in table.rows() {
            let record: ProductRecord = self
                .create(row)
                .await?
                .expect(StatusCode::CREATED)
                .await?
                .json()
                .await?;
            created.push(record);
        }
        Ok(created)
    }

    pub async fn reset_and_seed(&self, table: &FixtureTable) -> HarnessResult<Vec<ProductRecord>> {
        self.reset().await?;
        self.seed(table).await
    }

    /// Full collection; the service must answer 200 with a JSON array.
    pub async fn list_products(&self) -> HarnessResult<Vec<ProductRecord>> {
        self.list().await?.expect(StatusCode::OK).await?.json().await
    }

    pub async fn product_count(&self) -> HarnessResult<usize> {
        Ok(self.list_products().await?.len())
    }

    /// Locate a product by name in the full collection.
    pub async fn find_listed(&self, name: &str) -> HarnessResult<ProductRecord> {
        self.list_products()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| HarnessError::assertion(format!("no product named '{name}' is listed")))
    }

    /// An identifier guaranteed not to be assigned right now.
    pub async fn unused_id(&self) -> HarnessResult<u64> {
        let max = self
            .list_products()
            .await?
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(0);
        Ok(max + 1000)
    }

    /// Poll `GET /` until the service answers at all, or `timeout` elapses.
    ///
    /// Any HTTP status counts: only the interface the scenarios exercise is
    /// assumed, and the index scenario checks the answer itself.
    pub async fn wait_until_reachable(&self, timeout: Duration) -> HarnessResult<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.http.get(self.config.url("/")).send().await {
                Ok(response) => {
                    tracing::debug!(status = response.status().as_u16(), "service reachable");
                    return Ok(());
                }
                Err(e) => tracing::debug!(error = %e, "service not reachable yet"),
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(HarnessError::assertion(format!(
                    "service at {} not reachable within {}s",
                    self.config.base_url(),
                    timeout.as_secs_f32()
                )));
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}

#[async_trait]
impl ScenarioContext for ContractClient {
    async fn reset_fixtures(&self) -> HarnessResult<()> {
        self.reset_and_seed(&self.fixtures).await.map(|_| ())
    }
}
