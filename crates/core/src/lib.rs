//! Courtside
//!
//! Courtside is the pure domain core of a facility booking system: court kinds, slot rules,
//! coach schedules, equipment demand, price computation and waitlist offer windows. It performs
//! no I/O; persistence and locking live in `courtside-app`.

pub mod coaching;
pub mod courts;
pub mod errors;
pub mod inventory;
pub mod notifications;
pub mod pricing;
pub mod reservations;
pub mod slots;

pub use errors::ParseKindError;
