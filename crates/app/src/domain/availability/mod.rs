//! Availability
//!
//! Advisory read-side checks. Reservations re-derive each answer under row locks.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::AvailabilityServiceError;
pub use service::*;
