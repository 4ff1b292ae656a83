pub mod api;
pub mod auth;
pub mod config;
pub mod loader;
pub mod publish;
pub mod rebind;
