//! HTTP API: the product catalog service, its routes and the browser UI page.

pub mod app;
pub mod config;
pub mod middleware;
