//! Catalog
//!
//! Courts, equipment, coaches and pricing rules.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
