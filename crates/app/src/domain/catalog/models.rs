//! Catalog Models

use courtside::{coaching::WeeklyAvailability, courts::CourtKind, pricing::PricingRule};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Court UUID
pub type CourtUuid = TypedUuid<Court>;

/// Court Model
#[derive(Debug, Clone, Serialize)]
pub struct Court {
    pub uuid: CourtUuid,
    pub name: String,
    pub kind: CourtKind,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Court Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourt {
    pub uuid: CourtUuid,
    pub name: String,
    pub kind: CourtKind,
    pub is_active: bool,
}

/// Equipment UUID
pub type EquipmentUuid = TypedUuid<Equipment>;

/// Equipment Model
///
/// `stock` is the number of units the facility owns. Units held by a reservation are derived from
/// confirmed reservations rather than subtracted here.
#[derive(Debug, Clone, Serialize)]
pub struct Equipment {
    pub uuid: EquipmentUuid,
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub hourly_rate: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Equipment Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewEquipment {
    pub uuid: EquipmentUuid,
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub hourly_rate: Decimal,
}

/// Coach UUID
pub type CoachUuid = TypedUuid<Coach>;

/// Coach Model
#[derive(Debug, Clone, Serialize)]
pub struct Coach {
    pub uuid: CoachUuid,
    pub name: String,
    pub hourly_rate: Decimal,
    pub availability: WeeklyAvailability,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Coach Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoach {
    pub uuid: CoachUuid,
    pub name: String,
    pub hourly_rate: Decimal,
    pub availability: WeeklyAvailability,
}

/// Pricing Rule UUID
pub type PricingRuleUuid = TypedUuid<PricingRuleRecord>;

/// Stored pricing rule
#[derive(Debug, Clone, Serialize)]
pub struct PricingRuleRecord {
    pub uuid: PricingRuleUuid,
    #[serde(flatten)]
    pub rule: PricingRule,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// New Pricing Rule Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewPricingRule {
    pub uuid: PricingRuleUuid,
    pub rule: PricingRule,

    /// Make this the single active rule, deactivating the current one.
    pub activate: bool,
}
