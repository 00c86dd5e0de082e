//! Black-box checks of the product REST contract.

mod client;
mod scenarios;

pub use client::{ContractClient, Exchange, ProductRecord};
pub use scenarios::ContractScenario;
