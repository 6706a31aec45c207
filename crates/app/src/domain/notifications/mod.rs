//! Notifications
//!
//! Time-boxed slot offers sent to waitlisted users.

pub mod errors;
pub mod models;
pub(crate) mod offers;
pub(crate) mod repository;
pub mod service;

pub use errors::NotificationsServiceError;
pub use service::*;
