use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::app::dto;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn index() -> impl IntoResponse {
    (StatusCode::OK, Json(dto::SERVICE_INFO))
}
