//! HTTP API: configuration, authentication, routing and JSON mapping for the
//! bulk-products service.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
