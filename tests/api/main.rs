//! HTTP client tests against wiremock stand-ins for the Microsoft endpoints
//!
//! - auth: client-credentials token acquisition
//! - datasets: Power BI dataset listing, take-over and gateway binding
//! - items: Fabric item listing, creation, long running operations and deletion

mod auth;
mod datasets;
mod items;
