//! Users
//!
//! Users are authenticated elsewhere; this system only stores their identity.

use crate::uuids::TypedUuid;

/// User marker
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
