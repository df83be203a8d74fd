//! Integration tests for the docs gateway.
//!
//! The mock backend in `common` imitates the BI API: interactive docs under
//! `/docs`, the schema at `/openapi.json` and report data under `/bi/*`.

pub mod docs_test;
