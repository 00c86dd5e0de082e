//! Infrastructure layer: product storage adapters.

pub mod read_model;

pub use read_model::{InMemoryProductStore, ProductStore};
