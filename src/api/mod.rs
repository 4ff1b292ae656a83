//! REST clients for the Microsoft identity platform, Power BI and Fabric

pub mod auth;
pub mod client;
pub mod constants;
pub mod fabric;
pub mod models;
pub mod operations;

pub use auth::{authenticate, get_access_token};
pub use client::{PowerBiClient, http_client};
pub use fabric::FabricClient;
pub use models::{FabricItem, ItemDefinition, TokenInfo};
pub use operations::{DatasetOperation, OperationResult};
