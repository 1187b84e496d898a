//! # API Shared
//!
//! Shared wire types and utilities for the AFB APIs.
//!
//! Contains:
//! - Strict JSON wire models for form documents (`wire` module)
//! - REST request/response types with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `afb-core` (wire translation) and `api-rest` for common
//! functionality.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
