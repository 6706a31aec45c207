//! Waitlist
//!
//! Per-slot queues of users waiting for an occupied slot.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::WaitlistServiceError;
pub use service::*;
