//! HTTP contract scenarios.
//!
//! Each scenario assumes the standard fixture table has just been seeded.

use async_trait::async_trait;
use reqwest::{header::LOCATION, StatusCode};
use serde_json::{json, Value};

use super::client::{ContractClient, ProductRecord};
use crate::error::{ensure, HarnessError, HarnessResult};
use crate::runner::Scenario;

const SERVICE_NAME: &str = "Product Demo REST API Service";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractScenario {
    IndexNamesService,
    ListReturnsFixtures,
    GetByIdReturnsProduct,
    GetReservedIdIsNotFound,
    GetUnknownIdIsNotFound,
    CreateSetsLocation,
    CreateWithoutNameIsRejected,
    CreateRoundTripsFields,
    UpdateChangesFields,
    UpdateWithoutNameIsRejected,
    UpdateUnknownIdIsNotFound,
    DeleteRemovesOne,
    DeleteUnknownIdLeavesCount,
    QueryByCategoryIsExact,
    QueryByNameIsExact,
}

impl ContractScenario {
    pub const ALL: [ContractScenario; 15] = [
        ContractScenario::IndexNamesService,
        ContractScenario::ListReturnsFixtures,
        ContractScenario::GetByIdReturnsProduct,
        ContractScenario::GetReservedIdIsNotFound,
        ContractScenario::GetUnknownIdIsNotFound,
        ContractScenario::CreateSetsLocation,
        ContractScenario::CreateWithoutNameIsRejected,
        ContractScenario::CreateRoundTripsFields,
        ContractScenario::UpdateChangesFields,
        ContractScenario::UpdateWithoutNameIsRejected,
        ContractScenario::UpdateUnknownIdIsNotFound,
        ContractScenario::DeleteRemovesOne,
        ContractScenario::DeleteUnknownIdLeavesCount,
        ContractScenario::QueryByCategoryIsExact,
        ContractScenario::QueryByNameIsExact,
    ];
}

#[async_trait]
impl Scenario<ContractClient> for ContractScenario {
    fn name(&self) -> &'static str {
        match self {
            ContractScenario::IndexNamesService => "index names the service",
            ContractScenario::ListReturnsFixtures => "list returns every fixture",
            ContractScenario::GetByIdReturnsProduct => "get by id returns the product",
            ContractScenario::GetReservedIdIsNotFound => "get id 0 is not found",
            ContractScenario::GetUnknownIdIsNotFound => "get unknown id is not found",
            ContractScenario::CreateSetsLocation => "create answers 201 with location",
            ContractScenario::CreateWithoutNameIsRejected => "create without name is rejected",
            ContractScenario::CreateRoundTripsFields => "created fields read back verbatim",
            ContractScenario::UpdateChangesFields => "update changes stored fields",
            ContractScenario::UpdateWithoutNameIsRejected => "update without name is rejected",
            ContractScenario::UpdateUnknownIdIsNotFound => "update unknown id is not found",
            ContractScenario::DeleteRemovesOne => "delete removes exactly one product",
            ContractScenario::DeleteUnknownIdLeavesCount => "delete unknown id leaves count",
            ContractScenario::QueryByCategoryIsExact => "query by category is exact",
            ContractScenario::QueryByNameIsExact => "query by name is exact",
        }
    }

    async fn run(&self, client: &ContractClient) -> HarnessResult<()> {
        match self {
            ContractScenario::IndexNamesService => index_names_service(client).await,
            ContractScenario::ListReturnsFixtures => list_returns_fixtures(client).await,
            ContractScenario::GetByIdReturnsProduct => get_by_id_returns_product(client).await,
            ContractScenario::GetReservedIdIsNotFound => {
                client.get(0).await?.expect(StatusCode::NOT_FOUND).await?;
                Ok(())
            }
            ContractScenario::GetUnknownIdIsNotFound => {
                let id = client.unused_id().await?;
                client.get(id).await?.expect(StatusCode::NOT_FOUND).await?;
                Ok(())
            }
            ContractScenario::CreateSetsLocation => create_sets_location(client).await,
            ContractScenario::CreateWithoutNameIsRejected => create_without_name(client).await,
            ContractScenario::CreateRoundTripsFields => create_round_trips(client).await,
            ContractScenario::UpdateChangesFields => update_changes_fields(client).await,
            ContractScenario::UpdateWithoutNameIsRejected => update_without_name(client).await,
            ContractScenario::UpdateUnknownIdIsNotFound => {
                let body = json!({ "name": "GE4509", "category": "Microwave" });
                client.update(0, &body).await?.expect(StatusCode::NOT_FOUND).await?;
                Ok(())
            }
            ContractScenario::DeleteRemovesOne => delete_removes_one(client).await,
            ContractScenario::DeleteUnknownIdLeavesCount => delete_unknown_id(client).await,
            ContractScenario::QueryByCategoryIsExact => {
                query_is_exact(client, "category", "Microwave", category_of).await
            }
            ContractScenario::QueryByNameIsExact => {
                query_is_exact(client, "name", "GE4509", name_of).await
            }
        }
    }
}

async fn index_names_service(client: &ContractClient) -> HarnessResult<()> {
    let exchange = client.index().await?.expect(StatusCode::OK).await?;
    let operation = exchange.operation().to_string();
    let info: Value = exchange.json().await?;

    match info.get("name").and_then(Value::as_str) {
        Some(SERVICE_NAME) => Ok(()),
        Some(other) => Err(HarnessError::shape(
            operation,
            format!("service name is '{other}', expected '{SERVICE_NAME}'"),
        )),
        None => Err(HarnessError::shape(operation, "body has no 'name' field")),
    }
}

async fn list_returns_fixtures(client: &ContractClient) -> HarnessResult<()> {
    let products = client.list_products().await?;
    let fixtures = client.fixtures();

    ensure(products.len() == fixtures.len(), || {
        format!("listed {} products, seeded {}", products.len(), fixtures.len())
    })?;
    for row in fixtures.rows() {
        ensure(products.iter().any(|p| p.matches_row(row)), || {
            format!("fixture '{}' is not listed as seeded", row.name)
        })?;
    }
    Ok(())
}

async fn get_by_id_returns_product(client: &ContractClient) -> HarnessResult<()> {
    let listed = client.find_listed("Sierra").await?;
    let fetched: ProductRecord = client
        .get(listed.id)
        .await?
        .expect(StatusCode::OK)
        .await?
        .json()
        .await?;

    ensure(fetched == listed, || {
        format!("GET /products/{} returned {fetched:?}, listed {listed:?}", listed.id)
    })
}

async fn create_sets_location(client: &ContractClient) -> HarnessResult<()> {
    let before = client.product_count().await?;
    let body = json!({
        "name": "High_Sierra",
        "category": "Bag",
        "color": "blue",
        "price": "1234",
        "description": "Cool Bag",
    });

    let exchange = client.create(&body).await?.expect(StatusCode::CREATED).await?;
    let location = exchange
        .header(LOCATION)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| HarnessError::shape(exchange.operation(), "missing Location header"))?;
    let created: ProductRecord = exchange.json().await?;

    ensure(location.ends_with(&format!("/products/{}", created.id)), || {
        format!("Location '{location}' does not point at product {}", created.id)
    })?;

    let after = client.list_products().await?;
    ensure(after.len() == before + 1, || {
        format!("count went from {before} to {}, expected +1", after.len())
    })?;
    ensure(after.contains(&created), || {
        "created product is not listed".to_string()
    })
}

async fn create_without_name(client: &ContractClient) -> HarnessResult<()> {
    let before = client.product_count().await?;
    let body = json!({ "category": "Bag", "color": "blue" });

    client.create(&body).await?.expect(StatusCode::BAD_REQUEST).await?;

    let after = client.product_count().await?;
    ensure(after == before, || {
        format!("rejected create changed count from {before} to {after}")
    })
}

async fn create_round_trips(client: &ContractClient) -> HarnessResult<()> {
    let submitted = [
        ("name", "Asus2500"),
        ("category", "Laptop"),
        ("color", "wewef"),
        ("count", "234"),
        ("price", "qerwrw"),
        ("description", "erwwfwf"),
    ];
    let body: Value = submitted
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect::<serde_json::Map<_, _>>()
        .into();

    let created: ProductRecord = client
        .create(&body)
        .await?
        .expect(StatusCode::CREATED)
        .await?
        .json()
        .await?;
    let fetched: Value = client
        .get(created.id)
        .await?
        .expect(StatusCode::OK)
        .await?
        .json()
        .await?;

    for (field, expected) in submitted {
        let actual = fetched.get(field).and_then(Value::as_str);
        ensure(actual == Some(expected), || {
            format!("field '{field}' read back as {actual:?}, submitted '{expected}'")
        })?;
    }
    Ok(())
}

async fn update_changes_fields(client: &ContractClient) -> HarnessResult<()> {
    let target = client.find_listed("GE4509").await?;

    let full = json!({
        "name": "GE4509",
        "category": "Microwave",
        "color": "faded",
        "price": "1000",
        "description": "Dont buy",
    });
    client.update(target.id, &full).await?.expect(StatusCode::OK).await?;

    let fetched: ProductRecord = client
        .get(target.id)
        .await?
        .expect(StatusCode::OK)
        .await?
        .json()
        .await?;
    ensure(fetched.price == "1000", || {
        format!("price read back as '{}', updated to '1000'", fetched.price)
    })?;
    ensure(fetched.count == target.count, || {
        format!("count changed to '{}' though it was not sent", fetched.count)
    })?;

    let partial = json!({ "name": "GE4509", "description": "Partial" });
    client.update(target.id, &partial).await?.expect(StatusCode::OK).await?;

    let fetched: ProductRecord = client
        .get(target.id)
        .await?
        .expect(StatusCode::OK)
        .await?
        .json()
        .await?;
    ensure(fetched.description == "Partial" && fetched.price == "1000", || {
        format!("partial update left {fetched:?}")
    })
}

async fn update_without_name(client: &ContractClient) -> HarnessResult<()> {
    let target = client.find_listed("GE4509").await?;
    let body = json!({ "category": "Oven", "price": "1" });

    client
        .update(target.id, &body)
        .await?
        .expect(StatusCode::BAD_REQUEST)
        .await?;

    let fetched: ProductRecord = client
        .get(target.id)
        .await?
        .expect(StatusCode::OK)
        .await?
        .json()
        .await?;
    ensure(fetched == target, || {
        format!("rejected update modified the product: {fetched:?}")
    })
}

async fn delete_removes_one(client: &ContractClient) -> HarnessResult<()> {
    let before = client.product_count().await?;
    let target = client.find_listed("Asus2500").await?;

    let body = client
        .delete(target.id)
        .await?
        .expect(StatusCode::NO_CONTENT)
        .await?
        .text()
        .await?;
    ensure(body.is_empty(), || format!("delete answered with a body: {body}"))?;

    let after = client.product_count().await?;
    ensure(after + 1 == before, || {
        format!("count went from {before} to {after}, expected -1")
    })?;

    client.get(target.id).await?.expect(StatusCode::NOT_FOUND).await?;
    Ok(())
}

async fn delete_unknown_id(client: &ContractClient) -> HarnessResult<()> {
    let before = client.product_count().await?;
    let id = client.unused_id().await?;

    client.delete(id).await?.expect(StatusCode::NOT_FOUND).await?;

    let after = client.product_count().await?;
    ensure(after == before, || {
        format!("deleting unknown id {id} changed count from {before} to {after}")
    })
}

fn category_of(product: &ProductRecord) -> &str {
    &product.category
}

fn name_of(product: &ProductRecord) -> &str {
    &product.name
}

/// Every result carries `value` exactly, and no other fixture appears anywhere
/// in the raw body.
async fn query_is_exact(
    client: &ContractClient,
    field: &str,
    value: &str,
    project: fn(&ProductRecord) -> &str,
) -> HarnessResult<()> {
    let exchange = client.query(field, value).await?.expect(StatusCode::OK).await?;
    let operation = exchange.operation().to_string();
    let (raw, products): (String, Vec<ProductRecord>) = exchange.json_with_raw().await?;

    if products.is_empty() {
        return Err(HarnessError::shape(operation, "no products matched"));
    }
    for product in &products {
        if project(product) != value {
            return Err(HarnessError::shape(
                &operation,
                format!("'{}' has {field} '{}'", product.name, project(product)),
            ));
        }
    }

    let matched: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    for name in client.fixtures().names().filter(|n| !matched.contains(n)) {
        ensure(!raw.contains(name), || {
            format!("{operation} body mentions '{name}'")
        })?;
    }
    Ok(())
}
