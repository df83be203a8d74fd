//! HTTP edge for the BI dashboard backend.
//!
//! Serves the backend's interactive API documentation below `/docs`,
//! remounting the OpenAPI schema under `/api`, and forwards `/api/bi/*`
//! data requests to the backend's `/bi/*` routes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod proxy;
pub mod server;
pub mod telemetry;
