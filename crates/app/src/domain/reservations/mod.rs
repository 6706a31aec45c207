//! Reservations
//!
//! The transactional booking engine: reserve, cancel and price a slot.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::ReservationsServiceError;
pub use service::*;
