use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use catalog_products::ProductDraft;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Unwrap a JSON body, turning any decoding failure into a 400 response.
pub fn read_draft(
    body: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<ProductDraft, axum::response::Response> {
    body.map(|Json(draft)| draft)
        .map_err(errors::json_rejection_to_response)
}

// -------------------------
// Response DTOs
// -------------------------

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub url: &'static str,
}

pub const SERVICE_INFO: ServiceInfo = ServiceInfo {
    name: "Product Demo REST API Service",
    version: "1.0",
    url: "/products",
};

pub fn product_location(id: catalog_core::ProductId) -> String {
    format!("/products/{id}")
}
