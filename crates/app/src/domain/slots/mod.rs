//! Slots
//!
//! The registry of bookable (court, date, start time) units.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::SlotsServiceError;
pub use service::*;
