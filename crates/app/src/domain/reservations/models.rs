//! Reservation Models

use courtside::{pricing::PriceBreakdown, reservations::ReservationStatus};
use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::{
        catalog::models::{CoachUuid, CourtUuid, EquipmentUuid},
        notifications::models::Notification,
        slots::models::SlotUuid,
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Reservation UUID
pub type ReservationUuid = TypedUuid<Reservation>;

/// Units of one equipment type held by a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquipmentHolding {
    pub equipment: EquipmentUuid,
    pub quantity: u32,
}

/// Reservation Model
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub uuid: ReservationUuid,
    pub user: UserUuid,
    pub court: CourtUuid,
    pub coach: Option<CoachUuid>,
    pub slot: SlotUuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub equipment: Vec<EquipmentHolding>,

    /// Frozen when the reservation is created.
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Booking request
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub uuid: ReservationUuid,
    pub user: UserUuid,
    pub court: CourtUuid,
    pub date: Date,
    pub start_time: Time,

    /// One unit per entry; repeat an identity to hold several units.
    pub equipment: Vec<EquipmentUuid>,
    pub coach: Option<CoachUuid>,
}

/// Result of a cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct Cancellation {
    pub reservation: Reservation,

    /// Offer sent to the head of the slot's waitlist, if anyone was waiting.
    pub notification: Option<Notification>,
}

/// Price request for a prospective booking
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub court: CourtUuid,
    pub date: Date,
    pub start_time: Time,
    pub equipment: Vec<EquipmentUuid>,
    pub coach: Option<CoachUuid>,
}

/// Itemized price of a prospective booking.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub court: CourtUuid,
    pub date: Date,
    pub start_time: Time,
    pub rule_name: String,
    pub breakdown: PriceBreakdown,
}

/// A user's booking totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReservationSummary {
    /// Confirmed reservations.
    pub active: u64,

    /// Sum over reservations that were not cancelled.
    pub total_spent: Decimal,
}
