//! Test Helpers

use jiff::civil::{Date, Time};

use crate::domain::{
    catalog::models::CourtUuid,
    reservations::models::{NewReservation, ReservationUuid},
    users::UserUuid,
};

/// A court-only booking request.
pub(crate) fn new_reservation(
    user: UserUuid,
    court: CourtUuid,
    date: Date,
    start_time: Time,
) -> NewReservation {
    NewReservation {
        uuid: ReservationUuid::new(),
        user,
        court,
        date,
        start_time,
        equipment: Vec::new(),
        coach: None,
    }
}
